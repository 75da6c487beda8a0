// src/lib.rs

//! Depsolve
//!
//! Resolves a package's transitive dependencies into a single,
//! conflict-free, dependency-ordered installation plan.
//!
//! # Architecture
//!
//! - Registry: immutable package metadata (dependencies, conflicts, provides)
//! - Closure expansion: everything a request pulls in, minus what is installed
//! - Conflict check: mutually exclusive packages in the closure
//! - Ordering: dependencies-first install order with exact cycle detection
//!
//! Fetching, unpacking and recording installed packages are left to the
//! caller.

mod error;
pub mod progress;
pub mod registry;
pub mod resolver;

pub use error::{Error, Result};
pub use progress::{
    CallbackObserver, LogObserver, ResolveEvent, ResolveObserver, SilentObserver,
};
pub use registry::{
    load_manifest, parse_manifest_json, parse_manifest_toml, OptionalDependency, PackageId,
    PackageRecord, Registry, RegistryBuilder, RegistryManifest, ResolveRequest,
};
pub use resolver::{
    check_conflicts, expand, resolve, Closure, OptionalSuggestion, Resolution, ResolvedPlan,
    Resolver,
};
