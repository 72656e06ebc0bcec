// src/cli.rs
//! CLI definitions for stockpot
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stockpot")]
#[command(author = "Stockpot Contributors")]
#[command(version)]
#[command(about = "Fetch, build and package native libraries from recipes", long_about = None)]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Build settings shared by every stage that compiles or stages files
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Target operating system (default: host)
    #[arg(long)]
    pub os: Option<String>,

    /// Compiler identity (default: the OS's usual compiler)
    #[arg(long)]
    pub compiler: Option<String>,

    /// Build type: Debug, Release, RelWithDebInfo, MinSizeRel
    #[arg(long, default_value = "Release")]
    pub build_type: String,

    /// Target architecture (default: host)
    #[arg(long)]
    pub arch: Option<String>,

    /// Build static libraries (default: the recipe's `shared` option)
    #[arg(long = "static", conflicts_with = "shared")]
    pub static_linkage: bool,

    /// Build shared libraries
    #[arg(long)]
    pub shared: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a recipe's sources
    Source {
        /// Recipe file, or the name of a builtin recipe (e.g. libvault)
        recipe: String,

        /// Directory to fetch into (must be absent or empty)
        #[arg(short, long)]
        dest: String,
    },

    /// Configure and compile fetched sources
    Build {
        /// Recipe file, or the name of a builtin recipe
        recipe: String,

        /// Fetched source directory
        #[arg(short, long)]
        source: String,

        /// Build directory
        #[arg(short, long)]
        build_dir: String,

        /// Parallel compile jobs (default: CPU count)
        #[arg(short, long)]
        jobs: Option<u32>,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Stage build outputs into a package directory
    Package {
        /// Recipe file, or the name of a builtin recipe
        recipe: String,

        /// Fetched source directory
        #[arg(short, long)]
        source: String,

        /// Completed build directory
        #[arg(short, long)]
        build_dir: String,

        /// Package root to stage into
        #[arg(short, long)]
        package_root: String,

        /// Remove the package root before staging
        #[arg(long)]
        clean: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Show package metadata and link libraries
    Info {
        /// Recipe file, or the name of a builtin recipe
        recipe: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Fetch, build and package in one go
    Cook {
        /// Recipe file, or the name of a builtin recipe
        recipe: String,

        /// Package root to stage into
        #[arg(short, long)]
        package_root: String,

        /// Parent directory for scratch build directories
        #[arg(long)]
        work_dir: Option<String>,

        /// Parallel compile jobs (default: CPU count)
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Keep the scratch directory after the cook
        #[arg(long)]
        keep_builddir: bool,

        /// Remove the package root before staging
        #[arg(long)]
        clean: bool,

        /// Only validate the recipe, don't cook
        #[arg(long)]
        validate_only: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}
