// src/commands/cook.rs

//! Cook command - fetch, build and package in one go

use super::{load_recipe, resolve_settings};
use crate::cli::SettingsArgs;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stockpot::{Kitchen, KitchenConfig};
use tracing::info;

/// Options for a full cook
pub struct CookOptions<'a> {
    pub package_root: &'a str,
    pub work_dir: Option<&'a str>,
    pub jobs: Option<u32>,
    pub keep_builddir: bool,
    pub clean: bool,
    pub validate_only: bool,
}

/// Cook a recipe into a package root
pub fn cmd_cook(recipe_spec: &str, opts: CookOptions<'_>, settings: &SettingsArgs) -> Result<()> {
    println!("Reading recipe: {}", recipe_spec);
    let recipe = load_recipe(recipe_spec)?;
    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);

    let settings = resolve_settings(settings, &recipe)?;
    recipe
        .artifact_set()
        .validate_for(&settings)
        .with_context(|| format!("Recipe cannot be packaged for {}", settings))?;

    if opts.validate_only {
        println!("[OK] Recipe validation passed for {}", settings);
        return Ok(());
    }

    let mut config = KitchenConfig {
        work_dir: opts.work_dir.map(PathBuf::from),
        keep_builddir: opts.keep_builddir,
        clean_package_root: opts.clean,
        ..Default::default()
    };
    if let Some(j) = opts.jobs {
        config.jobs = j;
    }

    println!("Cooking for {} with {} parallel jobs...", settings, config.jobs);

    let package_root = Path::new(opts.package_root);
    let kitchen = Kitchen::new(config);
    let result = kitchen
        .cook(&recipe, &settings, package_root)
        .with_context(|| format!("Failed to cook {}", recipe.package.name))?;

    println!("\n[COMPLETE] Cooked into {}", result.package_root.display());
    for file in &result.manifest.files {
        println!("  - {}", file.path);
    }
    println!("Link libraries: {}", result.manifest.package_info.libs.join(", "));
    if let Some(dir) = &result.build_dir {
        println!("Build directory kept at {}", dir.display());
    }

    info!(
        "Successfully cooked {} into {}",
        recipe.package.name,
        result.package_root.display()
    );

    Ok(())
}
