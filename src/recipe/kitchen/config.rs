// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::recipe::descriptor::PackageManifest;
use std::path::{Path, PathBuf};

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Parent directory for per-cook scratch directories (system temp dir if unset)
    pub work_dir: Option<PathBuf>,
    /// Number of parallel compile jobs
    pub jobs: u32,
    /// Keep the scratch directory (sources + build tree) after the cook
    pub keep_builddir: bool,
    /// Remove the package root before staging artifacts
    ///
    /// Off by default: staging overwrites files in place and leaves
    /// unrelated files alone.
    pub clean_package_root: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            work_dir: None,
            jobs,
            keep_builddir: false,
            clean_package_root: false,
        }
    }
}

impl KitchenConfig {
    /// Configuration that places scratch directories under `work_dir` and keeps them
    pub fn keeping_builds_in(work_dir: &Path) -> Self {
        Self {
            work_dir: Some(work_dir.to_path_buf()),
            keep_builddir: true,
            ..Self::default()
        }
    }
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// Package root the artifacts were staged into
    pub package_root: PathBuf,
    /// Manifest written into the package root
    pub manifest: PackageManifest,
    /// Build log
    pub log: String,
    /// Scratch directory, when it was kept
    pub build_dir: Option<PathBuf>,
}
