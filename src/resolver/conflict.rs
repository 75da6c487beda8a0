// src/resolver/conflict.rs

//! Conflict detection across a closure
//!
//! A conflict only needs to be declared on one side: if `f` lists `b` as a
//! conflict, any closure holding both fails no matter which was requested.
//! Matching is by exact id. A conflict against a virtual package name does
//! not match the packages that provide it.
//!
//! A package that replaces another cannot be installed alongside it either,
//! so `replaces` entries are checked after `conflicts`.

use super::closure::Closure;
use crate::error::{Error, Result};
use crate::registry::Registry;

/// Fail with `ConflictDetected` on the first pair of mutually exclusive
/// packages in `closure`
///
/// Members are checked in closure order and each member's conflicts in
/// declared order, so the reported pair is deterministic.
pub fn check_conflicts(closure: &Closure, registry: &Registry) -> Result<()> {
    for pkg in closure {
        let record = registry.lookup(pkg, None)?;
        for conflict in record.conflicts.iter().chain(&record.replaces) {
            if conflict != pkg && closure.contains(conflict.as_str()) {
                return Err(Error::ConflictDetected {
                    package: pkg.clone(),
                    conflicting_with: conflict.clone(),
                });
            }
        }
    }
    Ok(())
}
