// src/commands/source.rs

//! Source command - fetch a recipe's sources

use super::load_recipe;
use anyhow::{Context, Result};
use std::path::Path;
use stockpot::Kitchen;
use tracing::info;

/// Fetch the recipe's sources into `dest`
pub fn cmd_source(recipe: &str, dest: &str) -> Result<()> {
    let recipe = load_recipe(recipe)?;
    let dest = Path::new(dest);

    println!("Fetching {} {}", recipe.package.name, recipe.package.version);
    let kitchen = Kitchen::with_defaults();
    let location = kitchen
        .source(&recipe, dest)
        .with_context(|| format!("Failed to fetch sources for {}", recipe.package.name))?;

    info!("Fetched {} into {}", recipe.source_url(), location.path().display());
    println!("[COMPLETE] Sources in {}", location.path().display());
    Ok(())
}
