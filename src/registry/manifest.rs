// src/registry/manifest.rs

//! Parser for registry manifest files (TOML or JSON).
//!
//! ```toml
//! [packages.a]
//! depends = ["b"]
//!
//! [packages.b]
//! conflicts = ["f"]
//! provides = ["mta"]
//! replaces = ["old-b"]
//! optdepends = ["c: for extra output"]
//!
//! [request]
//! install = ["a"]
//! installed = []
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{OptionalDependency, PackageId, PackageRecord, Registry};
use crate::error::{Error, Result};

/// A registry manifest as it appears on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    /// Package name -> metadata
    #[serde(default)]
    pub packages: BTreeMap<String, PackageEntry>,

    /// Default request for the driver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ResolveRequest>,
}

/// One package entry in a manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageEntry {
    #[serde(default)]
    pub depends: Vec<String>,

    #[serde(default)]
    pub conflicts: Vec<String>,

    #[serde(default)]
    pub provides: Vec<String>,

    /// Treated as conflicts by the resolver
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<String>,

    /// `"package: description"` entries, reported but never installed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optdepends: Vec<String>,
}

/// Packages to install and packages already present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub install: Vec<PackageId>,

    #[serde(default)]
    pub installed: Vec<PackageId>,
}

impl RegistryManifest {
    /// Build the registry, handing back the optional request section
    pub fn into_parts(self) -> (Registry, Option<ResolveRequest>) {
        let mut builder = Registry::builder();
        for (name, entry) in self.packages {
            let record = PackageRecord::new()
                .with_dependencies(entry.depends)
                .with_conflicts(entry.conflicts)
                .with_provides(entry.provides)
                .with_replaces(entry.replaces)
                .with_optional(entry.optdepends.iter().map(|o| OptionalDependency::parse(o)));
            builder.insert(name, record);
        }
        (builder.build(), self.request)
    }

    /// Serialize the manifest to TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load a manifest, choosing the parser by file extension
pub fn load_manifest(path: &Path) -> Result<RegistryManifest> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_manifest_toml(&content),
        Some("json") => parse_manifest_json(&content),
        _ => Err(Error::UnsupportedManifest(path.display().to_string())),
    }
}

/// Parse a manifest from a TOML string
pub fn parse_manifest_toml(content: &str) -> Result<RegistryManifest> {
    Ok(toml::from_str(content)?)
}

/// Parse a manifest from a JSON string
pub fn parse_manifest_json(content: &str) -> Result<RegistryManifest> {
    Ok(serde_json::from_str(content)?)
}
