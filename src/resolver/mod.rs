// src/resolver/mod.rs

//! Dependency resolution and conflict detection
//!
//! Turns a set of requested packages into a conflict-free install order:
//!
//! 1. [`expand`] computes the transitive closure, pruning packages that are
//!    already installed and failing on cycles or unknown packages.
//! 2. [`check_conflicts`] rejects closures holding mutually exclusive
//!    packages.
//! 3. [`resolve`] orders the closure dependencies-first and verifies the
//!    result.
//!
//! Every step is fail-fast: the first problem aborts the whole resolution
//! and no partial plan is returned. The [`Resolver`] facade runs all three
//! steps and routes progress to an optional observer.

mod closure;
mod conflict;
mod order;
mod path;
mod plan;

pub use closure::{expand, Closure};
pub use conflict::check_conflicts;
pub use order::resolve;
pub use plan::{OptionalSuggestion, Resolution, ResolvedPlan};

use crate::error::Result;
use crate::progress::{ResolveObserver, SilentObserver};
use crate::registry::{PackageId, Registry};
use std::collections::HashSet;
use tracing::debug;

/// Dependency resolver over one registry snapshot
///
/// Holds no state between calls; one resolver (or many) may run
/// concurrently against the same registry.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a Registry,
    observer: &'a dyn ResolveObserver,
}

impl<'a> Resolver<'a> {
    /// Create a resolver that reports nothing
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            observer: &SilentObserver,
        }
    }

    /// Create a resolver reporting progress to `observer`
    pub fn with_observer(registry: &'a Registry, observer: &'a dyn ResolveObserver) -> Self {
        Self { registry, observer }
    }

    /// Compute the closure of `requested`
    pub fn expand(&self, requested: &[PackageId], installed: &HashSet<PackageId>) -> Result<Closure> {
        closure::expand_with(requested, installed, self.registry, self.observer)
    }

    /// Reject closures containing conflicting packages
    pub fn check_conflicts(&self, closure: &Closure) -> Result<()> {
        check_conflicts(closure, self.registry)
    }

    /// Order a closure for installation
    pub fn order(&self, closure: &Closure, installed: &HashSet<PackageId>) -> Result<Resolution> {
        order::resolve_with(
            closure.members(),
            installed,
            closure.requested(),
            self.registry,
            self.observer,
        )
    }

    /// Resolve dependencies for installing `requested`
    ///
    /// Runs expansion, the conflict check and ordering in sequence.
    pub fn resolve_install(
        &self,
        requested: &[PackageId],
        installed: &HashSet<PackageId>,
    ) -> Result<Resolution> {
        let closure = self.expand(requested, installed)?;
        debug!(
            "Closure of {} requested package(s) holds {} package(s)",
            requested.len(),
            closure.len()
        );

        self.check_conflicts(&closure)?;
        self.order(&closure, installed)
    }
}
