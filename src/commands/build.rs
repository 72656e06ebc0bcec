// src/commands/build.rs

//! Build command - configure and compile fetched sources

use super::{load_recipe, resolve_settings};
use crate::cli::SettingsArgs;
use anyhow::{Context, Result};
use std::path::Path;
use stockpot::recipe::kitchen::require_dir;
use stockpot::recipe::SourceLocation;
use stockpot::{Kitchen, KitchenConfig};

/// Configure and compile the sources in `source` into `build_dir`
pub fn cmd_build(
    recipe: &str,
    source: &str,
    build_dir: &str,
    jobs: Option<u32>,
    settings: &SettingsArgs,
) -> Result<()> {
    let recipe = load_recipe(recipe)?;
    let settings = resolve_settings(settings, &recipe)?;
    let source = Path::new(source);
    require_dir(source, "Source")?;

    let mut config = KitchenConfig::default();
    if let Some(j) = jobs {
        config.jobs = j;
    }

    println!(
        "Building {} {} for {} with {} job(s)",
        recipe.package.name, recipe.package.version, settings, config.jobs
    );

    let kitchen = Kitchen::new(config);
    let output = kitchen
        .build(&recipe, SourceLocation::new(source), &settings, Path::new(build_dir))
        .with_context(|| format!("Failed to build {}", recipe.package.name))?;

    println!("[COMPLETE] Build output in {}", output.path().display());
    Ok(())
}
