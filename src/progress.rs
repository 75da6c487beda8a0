// src/progress.rs

//! Resolution observers
//!
//! The closure expander and the resolver report what they are doing
//! through a [`ResolveObserver`] supplied by the caller instead of writing
//! to the console. Implementations:
//! - `SilentObserver`: no-op for library use and quiet modes
//! - `LogObserver`: forwards events to tracing
//! - `CallbackObserver`: calls a user-provided function per event
//!
//! # Example
//!
//! ```
//! use depsolve::progress::{CallbackObserver, ResolveEvent};
//! use depsolve::{PackageId, PackageRecord, Registry, Resolver};
//!
//! let registry = Registry::builder()
//!     .package("a", PackageRecord::new())
//!     .build();
//! let observer = CallbackObserver::new(|event: &ResolveEvent| println!("{event}"));
//! let resolver = Resolver::with_observer(&registry, &observer);
//! resolver
//!     .resolve_install(&[PackageId::from("a")], &Default::default())
//!     .unwrap();
//! ```

use crate::registry::PackageId;
use std::fmt;
use tracing::{debug, info};

/// Something that happened during expansion or ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveEvent {
    /// The expander entered a package
    Expanding(PackageId),
    /// A package's (concrete) direct dependencies were looked up
    Dependencies {
        package: PackageId,
        dependencies: Vec<PackageId>,
    },
    /// A package was skipped because it is already installed
    AlreadyInstalled(PackageId),
    /// The resolver entered a package
    Resolving(PackageId),
    /// The resolver revisited a package that is already placed
    AlreadyResolved(PackageId),
    /// Checking that every dependency of a package was placed
    VerifyingDependencies(PackageId),
    /// A package was appended to the install order
    Resolved(PackageId),
    /// Final check that every closure member was placed
    VerifyingPlan,
    /// Resolution finished with this many packages to install
    Finished { to_install: usize },
}

impl fmt::Display for ResolveEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveEvent::Expanding(pkg) => write!(f, "getting deps of {}", pkg),
            ResolveEvent::Dependencies {
                package,
                dependencies,
            } => {
                if dependencies.is_empty() {
                    write!(f, "{} has no dependencies", package)
                } else {
                    let names: Vec<&str> = dependencies.iter().map(PackageId::as_str).collect();
                    write!(f, "{} has dependencies [{}]", package, names.join(", "))
                }
            }
            ResolveEvent::AlreadyInstalled(pkg) => write!(f, "{} is already installed", pkg),
            ResolveEvent::Resolving(pkg) => write!(f, "resolving {}", pkg),
            ResolveEvent::AlreadyResolved(pkg) => write!(f, "{} already resolved", pkg),
            ResolveEvent::VerifyingDependencies(pkg) => {
                write!(f, "verifying resolution of {}", pkg)
            }
            ResolveEvent::Resolved(pkg) => write!(f, "{} resolved", pkg),
            ResolveEvent::VerifyingPlan => write!(f, "resolution complete, verifying"),
            ResolveEvent::Finished { to_install: 0 } => write!(f, "there is nothing to do"),
            ResolveEvent::Finished { to_install } => {
                write!(f, "finished, {} package(s) to install", to_install)
            }
        }
    }
}

/// Core trait for observing a resolution
///
/// Implementations must be thread-safe so one observer can be shared by
/// resolutions running on several threads.
pub trait ResolveObserver: Send + Sync {
    /// Called once per event, in traversal order
    fn event(&self, event: &ResolveEvent);
}

/// Silent observer (no-op)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl ResolveObserver for SilentObserver {
    fn event(&self, _event: &ResolveEvent) {}
}

/// Logging observer
///
/// Per-package events go to tracing at debug level, the final summary at
/// info level.
#[derive(Debug, Clone)]
pub struct LogObserver {
    name: String,
}

impl LogObserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new("resolve")
    }
}

impl ResolveObserver for LogObserver {
    fn event(&self, event: &ResolveEvent) {
        match event {
            ResolveEvent::Finished { .. } => info!("{}: {}", self.name, event),
            _ => debug!("{}: {}", self.name, event),
        }
    }
}

/// Callback-based observer
pub struct CallbackObserver<F>
where
    F: Fn(&ResolveEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackObserver<F>
where
    F: Fn(&ResolveEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ResolveObserver for CallbackObserver<F>
where
    F: Fn(&ResolveEvent) + Send + Sync,
{
    fn event(&self, event: &ResolveEvent) {
        (self.callback)(event);
    }
}
