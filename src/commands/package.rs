// src/commands/package.rs

//! Package command - stage build outputs into a package root

use super::{load_recipe, resolve_settings};
use crate::cli::SettingsArgs;
use anyhow::{Context, Result};
use std::path::Path;
use stockpot::recipe::kitchen::require_dir;
use stockpot::recipe::{BuildOutputLocation, SourceLocation};
use stockpot::{Kitchen, KitchenConfig};

/// Stage artifacts from `build_dir` and `source` into `package_root`
pub fn cmd_package(
    recipe: &str,
    source: &str,
    build_dir: &str,
    package_root: &str,
    clean: bool,
    settings: &SettingsArgs,
) -> Result<()> {
    let recipe = load_recipe(recipe)?;
    let settings = resolve_settings(settings, &recipe)?;
    let source = Path::new(source);
    let build_dir = Path::new(build_dir);
    require_dir(source, "Source")?;
    require_dir(build_dir, "Build")?;

    let config = KitchenConfig {
        clean_package_root: clean,
        ..Default::default()
    };
    let kitchen = Kitchen::new(config);
    let manifest = kitchen
        .package(
            &recipe,
            SourceLocation::new(source),
            BuildOutputLocation::new(build_dir),
            &settings,
            Path::new(package_root),
        )
        .with_context(|| format!("Failed to package {}", recipe.package.name))?;

    println!("[COMPLETE] Packaged {} file(s) into {}", manifest.files.len(), package_root);
    for file in &manifest.files {
        println!("  - {}", file.path);
    }
    Ok(())
}
