// src/recipe/mod.rs

//! Recipe system for packaging native libraries
//!
//! A recipe says where a library's sources live, how its build system is
//! driven and which build outputs form the redistributable package.
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The packaging description (like a recipe card)
//! - **Kitchen**: Runs the stages with pluggable source and build backends
//! - **Cook**: One run of a recipe through the stages
//! - **Plate**: Stage the build outputs into the package layout
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "libvault"
//! version = "0.10.0"
//! license = "MIT"
//!
//! [source]
//! git = "https://github.com/abedra/libvault.git"
//!
//! [build]
//! system = "cmake"
//!
//! [package_info]
//! libs = ["vault"]
//! header = "include/VaultClient.h"
//! ```

pub mod artifacts;
pub mod builtin;
mod descriptor;
mod format;
pub mod kitchen;
pub mod parser;

pub use artifacts::{ArtifactKind, ArtifactRoot, ArtifactRule, ArtifactSet};
pub use descriptor::{MANIFEST_FILE, PackageDescriptor, PackageInfo, PackageManifest, StagedFile};
pub use format::{
    BuildSection, OptionsSection, PackageInfoSection, PackageSection, Recipe, SourceSection,
};
pub use kitchen::{
    AutoSource, BuildOutputLocation, BuildSystem, CMake, Cook, CookResult, CookStage, GitSource,
    Kitchen, KitchenConfig, LocalSource, SourceLocation, SourceProvider,
};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
