// src/cli.rs
//! CLI definitions for depsolve
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depsolve")]
#[command(author = "Depsolve Contributors")]
#[command(version)]
#[command(about = "Resolve package dependencies into an install order", long_about = None)]
pub struct Cli {
    /// Log every resolution step (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Registry and request shared by the resolving commands
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Registry manifest (.toml or .json)
    #[arg(short, long)]
    pub registry: PathBuf,

    /// Packages to install (default: the manifest's [request] install list)
    pub packages: Vec<String>,

    /// Package already installed (repeatable; default: the manifest's
    /// [request] installed list)
    #[arg(short, long = "installed")]
    pub installed: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the install order for the requested packages
    Resolve {
        #[command(flatten)]
        request: RequestArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every package the request pulls in, without ordering
    Closure {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Check that every dependency in a registry manifest can be satisfied
    Check {
        /// Registry manifest (.toml or .json)
        #[arg(short, long)]
        registry: PathBuf,
    },
}
