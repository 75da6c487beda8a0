// src/commands.rs
//! Command handlers for the depsolve CLI

use anyhow::{Context, Result};
use depsolve::{LogObserver, OptionalSuggestion, PackageId, Registry, Resolution, Resolver};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

use crate::cli::RequestArgs;

/// Registry plus the request to run against it
struct LoadedRequest {
    registry: Registry,
    install: Vec<PackageId>,
    installed: HashSet<PackageId>,
}

/// Load the manifest and merge the command-line request over its defaults
fn load_request(args: &RequestArgs) -> Result<LoadedRequest> {
    let manifest = depsolve::load_manifest(&args.registry).with_context(|| {
        format!("Failed to load registry manifest {}", args.registry.display())
    })?;
    let (registry, defaults) = manifest.into_parts();
    let defaults = defaults.unwrap_or_default();

    let install = if args.packages.is_empty() {
        defaults.install
    } else {
        args.packages.iter().map(|p| PackageId::from(p.as_str())).collect()
    };
    let installed = if args.installed.is_empty() {
        defaults.installed.into_iter().collect()
    } else {
        args.installed.iter().map(|p| PackageId::from(p.as_str())).collect()
    };

    info!(
        "Loaded {} package(s) from {}",
        registry.len(),
        args.registry.display()
    );
    Ok(LoadedRequest {
        registry,
        install,
        installed,
    })
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    install_order: &'a [PackageId],
    optional: &'a [OptionalSuggestion],
}

pub fn cmd_resolve(args: &RequestArgs, json: bool) -> Result<()> {
    let request = load_request(args)?;
    let observer = LogObserver::new("resolve");
    let resolver = Resolver::with_observer(&request.registry, &observer);

    let resolution = resolver.resolve_install(&request.install, &request.installed)?;
    let suggestions = resolution
        .plan()
        .map(|plan| plan.optional_suggestions(&request.registry, &request.installed))
        .unwrap_or_default();

    if json {
        let output = PlanOutput {
            install_order: resolution.install_order(),
            optional: &suggestions,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match resolution {
        Resolution::NothingToDo => println!("there is nothing to do"),
        Resolution::Plan(plan) => {
            println!("To install:");
            println!("Number\tName");
            for (i, pkg) in plan.iter().enumerate() {
                println!("{}\t{}", i + 1, pkg);
            }
        }
    }

    if !suggestions.is_empty() {
        println!();
        println!("Optional dependencies:");
        for suggestion in &suggestions {
            println!("  {} (for {})", suggestion.dependency, suggestion.wanted_by);
        }
    }
    Ok(())
}

pub fn cmd_closure(args: &RequestArgs) -> Result<()> {
    let request = load_request(args)?;
    let observer = LogObserver::new("closure");
    let resolver = Resolver::with_observer(&request.registry, &observer);

    let closure = resolver.expand(&request.install, &request.installed)?;
    if closure.is_empty() {
        println!("there is nothing to do");
    } else {
        println!("{} package(s) in closure:", closure.len());
        for pkg in &closure {
            println!("  {}", pkg);
        }
    }
    Ok(())
}

pub fn cmd_check(path: &std::path::Path) -> Result<()> {
    let manifest = depsolve::load_manifest(path)
        .with_context(|| format!("Failed to load registry manifest {}", path.display()))?;
    let (registry, _) = manifest.into_parts();

    registry.validate()?;
    println!("Registry OK: {} package(s)", registry.len());
    Ok(())
}

/// Process exit code for a failed command
///
/// 1 for resolution failures, 2 for everything else (I/O, malformed
/// manifests).
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<depsolve::Error>() {
        Some(e) if e.is_resolution_failure() => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_manifest(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("repo.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_request_falls_back_to_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            &dir,
            r#"
[packages.a]
depends = ["b"]

[packages.b]

[request]
install = ["a"]
installed = ["b"]
"#,
        );

        let args = RequestArgs {
            registry: path,
            packages: Vec::new(),
            installed: Vec::new(),
        };
        let request = load_request(&args).unwrap();
        assert_eq!(request.install, vec![PackageId::from("a")]);
        assert!(request.installed.contains("b"));
    }

    #[test]
    fn test_command_line_overrides_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            &dir,
            r#"
[packages.a]
[packages.b]

[request]
install = ["a"]
"#,
        );

        let args = RequestArgs {
            registry: path,
            packages: vec!["b".to_string()],
            installed: Vec::new(),
        };
        let request = load_request(&args).unwrap();
        assert_eq!(request.install, vec![PackageId::from("b")]);
        assert!(request.installed.is_empty());
    }

    #[test]
    fn test_exit_codes() {
        let cycle: anyhow::Error = depsolve::Error::CircularDependency {
            cycle_path: vec!["a".into(), "a".into()],
        }
        .into();
        assert_eq!(exit_code(&cycle), 1);

        let io: anyhow::Error = depsolve::Error::UnsupportedManifest("x.ini".to_string()).into();
        assert_eq!(exit_code(&io), 2);

        let wrapped = anyhow::Error::from(depsolve::Error::IncompleteResolution {
            package: "a".into(),
        })
        .context("resolving");
        assert_eq!(exit_code(&wrapped), 1);
    }
}
