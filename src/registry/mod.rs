// src/registry/mod.rs

//! Package registry
//!
//! An immutable view over package metadata: each package's ordered
//! dependency list, its declared conflicts, and the virtual packages it
//! provides. The registry is built once and then shared by reference
//! across any number of resolutions.

mod manifest;

pub use manifest::{
    load_manifest, parse_manifest_json, parse_manifest_toml, PackageEntry, RegistryManifest,
    ResolveRequest,
};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Opaque package identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for PackageId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for PackageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Metadata the resolver needs about a single package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    /// Direct dependencies, in declared order (order drives traversal)
    pub dependencies: Vec<PackageId>,
    /// Packages that must not be installed alongside this one
    pub conflicts: Vec<PackageId>,
    /// Virtual packages this package satisfies
    pub provides: Vec<PackageId>,
    /// Packages this one supersedes; they cannot share a closure with it
    pub replaces: Vec<PackageId>,
    /// Packages that add features but are never pulled in automatically
    pub optional: Vec<OptionalDependency>,
}

impl PackageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dependencies<I, T>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PackageId>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_conflicts<I, T>(mut self, conflicts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PackageId>,
    {
        self.conflicts = dedup(conflicts.into_iter().map(Into::into));
        self
    }

    pub fn with_provides<I, T>(mut self, provides: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PackageId>,
    {
        self.provides = dedup(provides.into_iter().map(Into::into));
        self
    }

    pub fn with_replaces<I, T>(mut self, replaces: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PackageId>,
    {
        self.replaces = dedup(replaces.into_iter().map(Into::into));
        self
    }

    pub fn with_optional<I>(mut self, optional: I) -> Self
    where
        I: IntoIterator<Item = OptionalDependency>,
    {
        self.optional = optional.into_iter().collect();
        self
    }
}

/// An optional dependency, written `"package: what it adds"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionalDependency {
    pub package: PackageId,
    pub description: Option<String>,
}

impl OptionalDependency {
    pub fn new(package: impl Into<PackageId>, description: Option<String>) -> Self {
        Self {
            package: package.into(),
            description,
        }
    }

    /// Parse `"python: for running scripts"` or a bare `"ruby"`
    pub fn parse(entry: &str) -> Self {
        match entry.split_once(':') {
            Some((pkg, desc)) => {
                let desc = desc.trim();
                Self::new(pkg.trim(), (!desc.is_empty()).then(|| desc.to_string()))
            }
            None => Self::new(entry.trim(), None),
        }
    }
}

impl fmt::Display for OptionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "{}: {}", self.package, desc),
            None => write!(f, "{}", self.package),
        }
    }
}

/// Keep the first occurrence of every id
fn dedup(ids: impl Iterator<Item = PackageId>) -> Vec<PackageId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(id.clone())).collect()
}

/// Immutable package registry with a virtual-package provider index
#[derive(Debug, Clone, Default)]
pub struct Registry {
    packages: BTreeMap<PackageId, PackageRecord>,
    /// Virtual id -> concrete packages providing it (sorted)
    providers: BTreeMap<PackageId, Vec<PackageId>>,
}

impl Registry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up a package record
    pub fn get(&self, id: &str) -> Option<&PackageRecord> {
        self.packages.get(id)
    }

    /// Look up a package record, failing with `UnknownPackage`
    ///
    /// `referencing` names the package whose dependency list mentioned `id`,
    /// or `None` when `id` was requested directly.
    pub fn lookup(&self, id: &PackageId, referencing: Option<&PackageId>) -> Result<&PackageRecord> {
        self.packages.get(id).ok_or_else(|| Error::UnknownPackage {
            referencing: referencing.cloned(),
            missing_id: id.clone(),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.packages.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All package ids, sorted
    pub fn package_ids(&self) -> impl Iterator<Item = &PackageId> {
        self.packages.keys()
    }

    /// Concrete packages providing a virtual id, sorted
    pub fn providers_of(&self, virtual_id: &str) -> &[PackageId] {
        self.providers
            .get(virtual_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pick the concrete package that satisfies a dependency on `dep`
    ///
    /// A real registry key always satisfies itself. Otherwise the providers
    /// of `dep` are consulted in sorted order: an already-installed provider
    /// wins, then one the caller asked for in `requested`, then the first
    /// provider. Returns `None` when nothing satisfies `dep`.
    ///
    /// The choice depends only on its inputs, so the expander and the
    /// ordering pass map every virtual dependency to the same package.
    pub fn satisfier<'a>(
        &'a self,
        dep: &'a PackageId,
        installed: &HashSet<PackageId>,
        requested: &HashSet<PackageId>,
    ) -> Option<&'a PackageId> {
        if self.packages.contains_key(dep) {
            return Some(dep);
        }
        let providers = self.providers.get(dep)?;
        providers
            .iter()
            .find(|p| installed.contains(*p))
            .or_else(|| providers.iter().find(|p| requested.contains(*p)))
            .or_else(|| providers.first())
    }

    /// Concrete dependencies of `pkg`, in declared order
    ///
    /// Each declared dependency is mapped through [`Registry::satisfier`].
    pub fn dependencies_of(
        &self,
        pkg: &PackageId,
        referencing: Option<&PackageId>,
        installed: &HashSet<PackageId>,
        requested: &HashSet<PackageId>,
    ) -> Result<Vec<PackageId>> {
        let record = self.lookup(pkg, referencing)?;
        record
            .dependencies
            .iter()
            .map(|dep| {
                self.satisfier(dep, installed, requested)
                    .cloned()
                    .ok_or_else(|| Error::UnknownPackage {
                        referencing: Some(pkg.clone()),
                        missing_id: dep.clone(),
                    })
            })
            .collect()
    }

    /// Check that every dependency is a known package or has a provider
    pub fn validate(&self) -> Result<()> {
        for (name, record) in &self.packages {
            for dep in &record.dependencies {
                if !self.packages.contains_key(dep) && !self.providers.contains_key(dep) {
                    return Err(Error::UnknownPackage {
                        referencing: Some(name.clone()),
                        missing_id: dep.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builder collecting package records before the registry is frozen
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    packages: BTreeMap<PackageId, PackageRecord>,
}

impl RegistryBuilder {
    /// Add (or replace) a package
    pub fn package(mut self, id: impl Into<PackageId>, record: PackageRecord) -> Self {
        self.insert(id, record);
        self
    }

    pub fn insert(&mut self, id: impl Into<PackageId>, record: PackageRecord) {
        self.packages.insert(id.into(), record);
    }

    /// Freeze the registry and build the provider index
    pub fn build(self) -> Registry {
        let mut providers: BTreeMap<PackageId, Vec<PackageId>> = BTreeMap::new();
        for (name, record) in &self.packages {
            for virtual_id in &record.provides {
                providers
                    .entry(virtual_id.clone())
                    .or_default()
                    .push(name.clone());
            }
        }

        Registry {
            packages: self.packages,
            providers,
        }
    }
}
