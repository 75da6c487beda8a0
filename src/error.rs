// src/error.rs

use thiserror::Error;

use crate::registry::PackageId;

/// Core error types for depsolve
///
/// The first five variants are resolution failures: each one aborts the
/// whole resolution and no partial plan is returned. The rest come from
/// loading registry manifests.
#[derive(Error, Debug)]
pub enum Error {
    /// A dependency (or request) names a package absent from the registry
    #[error("Unknown package {missing_id} ({})", referenced_by(.referencing))]
    UnknownPackage {
        referencing: Option<PackageId>,
        missing_id: PackageId,
    },

    /// A package was reached again while still on the active traversal path
    #[error("Circular dependency: {}", join_path(.cycle_path))]
    CircularDependency { cycle_path: Vec<PackageId> },

    /// Two packages in the closure are mutually exclusive
    #[error("{package} is in conflict with {conflicting_with}")]
    ConflictDetected {
        package: PackageId,
        conflicting_with: PackageId,
    },

    /// A dependency did not land in the plan after resolving it
    #[error("Resolution failure: {package} is missing dependency {missing_dependency}")]
    UnresolvedDependency {
        package: PackageId,
        missing_dependency: PackageId,
    },

    /// Final verification found a closure member that was never resolved
    #[error("Resolution incomplete: {package} missing from resolved set")]
    IncompleteResolution { package: PackageId },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML manifest
    #[error("Failed to parse TOML manifest: {0}")]
    ManifestToml(#[from] toml::de::Error),

    /// Malformed JSON manifest
    #[error("Failed to parse JSON manifest: {0}")]
    ManifestJson(#[from] serde_json::Error),

    /// Manifest with an extension we cannot parse
    #[error("Unsupported manifest format: {0}")]
    UnsupportedManifest(String),
}

impl Error {
    /// True for the resolution failure kinds, false for I/O and manifest errors
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Error::UnknownPackage { .. }
                | Error::CircularDependency { .. }
                | Error::ConflictDetected { .. }
                | Error::UnresolvedDependency { .. }
                | Error::IncompleteResolution { .. }
        )
    }
}

fn referenced_by(referencing: &Option<PackageId>) -> String {
    match referencing {
        Some(pkg) => format!("required by {}", pkg),
        None => "requested".to_string(),
    }
}

fn join_path(path: &[PackageId]) -> String {
    path.iter()
        .map(PackageId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type alias using depsolve's Error type
pub type Result<T> = std::result::Result<T, Error>;
