// src/resolver/order.rs

//! Install ordering
//!
//! Dependency-first topological sort (post-order DFS) over the closure.
//! Each closure member is resolved in closure order into one shared plan:
//! its dependencies are placed first, in declared order, then the member
//! itself. Cycles are detected on the active path independently of the
//! expander, since the two walks prune differently.

use std::collections::HashSet;

use super::path::ActivePath;
use super::plan::{Resolution, ResolvedPlan};
use crate::error::{Error, Result};
use crate::progress::{ResolveEvent, ResolveObserver, SilentObserver};
use crate::registry::{PackageId, Registry};

/// A package waiting for its dependencies to be placed
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

    /// Every dependency has been visited: verify and place the package
    fn close(
        self,
        plan: &mut ResolvedPlan,
        installed: &HashSet<PackageId>,
        observer: &dyn ResolveObserver,
    ) -> Result<()> {
        if !self.dependencies.is_empty() {
            observer.event(&ResolveEvent::VerifyingDependencies(self.package.clone()));
            for dep in &self.dependencies {
                if !plan.contains(dep.as_str()) && !installed.contains(dep) {
                    return Err(Error::UnresolvedDependency {
                        package: self.package,
                        missing_dependency: dep.clone(),
                    });
                }
            }
        }
        observer.event(&ResolveEvent::Resolved(self.package.clone()));
        plan.push(self.package);
        Ok(())
    }
}

/// Order `members` so every package follows its dependencies
///
/// Already-installed packages count as placed and never appear in the
/// plan. Returns `Resolution::NothingToDo` when nothing is left to install.
/// Virtual dependencies prefer providers among `members`.
pub fn resolve(
    members: &[PackageId],
    already_installed: &HashSet<PackageId>,
    registry: &Registry,
) -> Result<Resolution> {
    let requested: HashSet<PackageId> = members.iter().cloned().collect();
    resolve_with(members, already_installed, &requested, registry, &SilentObserver)
}

pub(crate) fn resolve_with(
    members: &[PackageId],
    installed: &HashSet<PackageId>,
    requested: &HashSet<PackageId>,
    registry: &Registry,
    observer: &dyn ResolveObserver,
) -> Result<Resolution> {
    let mut plan = ResolvedPlan::new();

    for root in members {
        observer.event(&ResolveEvent::Resolving(root.clone()));
        if plan.contains(root.as_str()) || installed.contains(root) {
            observer.event(&ResolveEvent::AlreadyResolved(root.clone()));
            continue;
        }

        let mut path = ActivePath::new();
        path.enter(root)?;
        let first = Frame::open(registry, installed, requested, observer, root, None)?;
        let mut stack = vec![first];

        while let Some(mut frame) = stack.pop() {
            let Some(dep) = frame.next_dependency() else {
                path.leave();
                frame.close(&mut plan, installed, observer)?;
                continue;
            };

            observer.event(&ResolveEvent::Resolving(dep.clone()));
            if plan.contains(dep.as_str()) || installed.contains(&dep) {
                observer.event(&ResolveEvent::AlreadyResolved(dep));
                stack.push(frame);
                continue;
            }

            path.enter(&dep)?;
            let child = Frame::open(
                registry,
                installed,
                requested,
                observer,
                &dep,
                Some(&frame.package),
            )?;
            stack.push(frame);
            stack.push(child);
        }
        debug_assert!(path.is_empty());
    }

    observer.event(&ResolveEvent::VerifyingPlan);
    for pkg in members {
        if !plan.contains(pkg.as_str()) && !installed.contains(pkg) {
            return Err(Error::IncompleteResolution {
                package: pkg.clone(),
            });
        }
    }

    observer.event(&ResolveEvent::Finished {
        to_install: plan.len(),
    });
    Ok(Resolution::from_plan(plan))
}
