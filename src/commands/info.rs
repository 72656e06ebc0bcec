// src/commands/info.rs

//! Info command - package metadata and link libraries

use super::load_recipe;
use anyhow::Result;
use stockpot::PackageDescriptor;

/// Print the package descriptor for a recipe
pub fn cmd_info(recipe: &str, json: bool) -> Result<()> {
    let recipe = load_recipe(recipe)?;
    let descriptor = PackageDescriptor::from_recipe(&recipe);

    if json {
        let value = serde_json::json!({
            "package": &descriptor,
            "package_info": descriptor.package_info(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Name:     {}", descriptor.name());
    println!("Version:  {}", descriptor.version());
    println!("License:  {}", descriptor.license());
    println!("Author:   {}", descriptor.author());
    println!("Homepage: {}", descriptor.homepage_url());
    println!("Summary:  {}", descriptor.description());
    let topics: Vec<&str> = descriptor.topics().iter().map(String::as_str).collect();
    println!("Topics:   {}", topics.join(", "));
    println!("Libs:     {}", descriptor.package_info().libs.join(", "));
    Ok(())
}
