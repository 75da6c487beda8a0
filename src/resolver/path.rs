// src/resolver/path.rs

//! Active traversal path used for exact cycle detection

use crate::error::{Error, Result};
use crate::registry::PackageId;
use std::collections::HashSet;

/// The chain of packages currently being traversed, root first
///
/// Re-entering a package that is already on the path is a true cycle.
#[derive(Debug, Default)]
pub(crate) struct ActivePath {
    order: Vec<PackageId>,
    members: HashSet<PackageId>,
}

impl ActivePath {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Push `pkg`, or fail with the cycle it closes
    ///
    /// The reported cycle starts and ends at the repeated package.
    pub(crate) fn enter(&mut self, pkg: &PackageId) -> Result<()> {
        if self.members.contains(pkg) {
            return Err(self.cycle_to(pkg));
        }
        self.members.insert(pkg.clone());
        self.order.push(pkg.clone());
        Ok(())
    }

    /// Pop the innermost package
    pub(crate) fn leave(&mut self) {
        if let Some(pkg) = self.order.pop() {
            self.members.remove(&pkg);
        }
    }

    pub(crate) fn contains(&self, pkg: &PackageId) -> bool {
        self.members.contains(pkg)
    }

    pub(crate) fn cycle_to(&self, pkg: &PackageId) -> Error {
        let start = self.order.iter().position(|p| p == pkg).unwrap_or(0);
        let mut cycle_path: Vec<PackageId> = self.order[start..].to_vec();
        cycle_path.push(pkg.clone());
        Error::CircularDependency { cycle_path }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
