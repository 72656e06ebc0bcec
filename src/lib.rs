// src/lib.rs

//! Stockpot
//!
//! Recipe-driven packaging for native libraries: fetch a library's
//! sources, drive its build system for one set of build settings, and
//! stage the resulting header and library files into a conventional
//! `include/`, `lib/`, `bin/` package layout.
//!
//! # Architecture
//!
//! - Recipes: TOML descriptions of a library (metadata, source, build, artifacts)
//! - Settings: an explicit, immutable `BuildSettings` passed to every stage
//! - Kitchen: runs the stages through pluggable `SourceProvider` and `BuildSystem` backends
//! - Manifest: `stockpot.toml` in each package root records what was staged

mod error;
pub mod hash;
pub mod recipe;
pub mod settings;

pub use error::{Error, Result};
pub use recipe::{
    ArtifactKind, ArtifactSet, Cook, CookResult, CookStage, Kitchen, KitchenConfig,
    PackageDescriptor, PackageInfo, PackageManifest, Recipe,
};
pub use settings::{Arch, BuildSettings, BuildType, Compiler, Os};
