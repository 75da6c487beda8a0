// src/resolver/closure.rs

//! Transitive closure expansion
//!
//! Walks the dependency lists of the requested packages depth-first, in
//! declared order, and collects every package that has to be installed.
//! Already-installed packages are pruned together with everything below
//! them. The walk uses an explicit stack so deep graphs cannot overflow
//! the call stack.

use std::collections::HashSet;

use super::path::ActivePath;
use crate::error::Result;
use crate::progress::{ResolveEvent, ResolveObserver, SilentObserver};
use crate::registry::{PackageId, Registry};

/// Every package taking part in one resolution, in first-encounter order
///
/// Also remembers the request it was expanded from, since the request
/// decides which provider stands in for a virtual dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    members: Vec<PackageId>,
    index: HashSet<PackageId>,
    requested: HashSet<PackageId>,
}

impl Closure {
    pub fn new() -> Self {
        Self::default()
    }

    fn for_request(requested: &[PackageId]) -> Self {
        Self {
            requested: requested.iter().cloned().collect(),
            ..Self::default()
        }
    }

    /// Add a package; returns false if it was already present
    pub(crate) fn insert(&mut self, pkg: PackageId) -> bool {
        if self.index.insert(pkg.clone()) {
            self.members.push(pkg);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, pkg: &str) -> bool {
        self.index.contains(pkg)
    }

    /// Members in the order the expander first met them
    pub fn members(&self) -> &[PackageId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageId> {
        self.members.iter()
    }

    /// Packages named in the request this closure was expanded from
    pub fn requested(&self) -> &HashSet<PackageId> {
        &self.requested
    }
}

/// A closure assembled by hand counts every member as requested
impl FromIterator<PackageId> for Closure {
    fn from_iter<I: IntoIterator<Item = PackageId>>(iter: I) -> Self {
        let mut closure = Closure::new();
        for pkg in iter {
            closure.insert(pkg);
        }
        closure.requested = closure.index.clone();
        closure
    }
}

impl<'a> IntoIterator for &'a Closure {
    type Item = &'a PackageId;
    type IntoIter = std::slice::Iter<'a, PackageId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// A package whose dependencies are being walked
struct Frame {
    package: PackageId,
    dependencies: Vec<PackageId>,
    next: usize,
}

impl Frame {
    fn open(
        registry: &Registry,
        installed: &HashSet<PackageId>,
        requested: &HashSet<PackageId>,
        observer: &dyn ResolveObserver,
        package: &PackageId,
        referencing: Option<&PackageId>,
    ) -> Result<Self> {
        observer.event(&ResolveEvent::Expanding(package.clone()));
        let dependencies = registry.dependencies_of(package, referencing, installed, requested)?;
        observer.event(&ResolveEvent::Dependencies {
            package: package.clone(),
            dependencies: dependencies.clone(),
        });
        Ok(Self {
            package: package.clone(),
            dependencies,
            next: 0,
        })
    }

    fn next_dependency(&mut self) -> Option<PackageId> {
        let dep = self.dependencies.get(self.next).cloned()?;
        self.next += 1;
        Some(dep)
    }
}

/// Compute the closure of `requested`, excluding `already_installed`
///
/// Fails with `UnknownPackage` for a request or dependency missing from the
/// registry and with `CircularDependency` when a package is reached again
/// while still on the active path.
pub fn expand(
    requested: &[PackageId],
    already_installed: &HashSet<PackageId>,
    registry: &Registry,
) -> Result<Closure> {
    expand_with(requested, already_installed, registry, &SilentObserver)
}

pub(crate) fn expand_with(
    requested: &[PackageId],
    installed: &HashSet<PackageId>,
    registry: &Registry,
    observer: &dyn ResolveObserver,
) -> Result<Closure> {
    let mut closure = Closure::for_request(requested);

    for root in requested {
        if installed.contains(root) {
            observer.event(&ResolveEvent::AlreadyInstalled(root.clone()));
            continue;
        }
        if closure.contains(root.as_str()) {
            continue;
        }

        let mut path = ActivePath::new();
        path.enter(root)?;
        closure.insert(root.clone());
        let first = Frame::open(registry, installed, &closure.requested, observer, root, None)?;
        let mut stack = vec![first];

        while let Some(mut frame) = stack.pop() {
            let Some(dep) = frame.next_dependency() else {
                path.leave();
                continue;
            };

            if installed.contains(&dep) {
                observer.event(&ResolveEvent::AlreadyInstalled(dep));
                stack.push(frame);
                continue;
            }
            if path.contains(&dep) {
                return Err(path.cycle_to(&dep));
            }
            if closure.contains(dep.as_str()) {
                // expanded on an earlier branch
                stack.push(frame);
                continue;
            }

            path.enter(&dep)?;
            closure.insert(dep.clone());
            let child = Frame::open(
                registry,
                installed,
                &closure.requested,
                observer,
                &dep,
                Some(&frame.package),
            )?;
            stack.push(frame);
            stack.push(child);
        }
    }

    Ok(closure)
}
