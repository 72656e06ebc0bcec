// src/commands/mod.rs
//! Command handlers for the stockpot CLI

mod build;
mod cook;
mod info;
mod package;
mod source;

pub use build::cmd_build;
pub use cook::{CookOptions, cmd_cook};
pub use info::cmd_info;
pub use package::cmd_package;
pub use source::cmd_source;

use crate::cli::SettingsArgs;
use anyhow::{Context, Result};
use std::path::Path;
use stockpot::recipe::{builtin, parse_recipe_file, validate_recipe};
use stockpot::{Arch, BuildSettings, BuildType, Compiler, Os, Recipe};

/// Load a recipe from a file path, falling back to the builtin recipes
pub fn load_recipe(spec: &str) -> Result<Recipe> {
    let path = Path::new(spec);
    let recipe = if path.exists() {
        parse_recipe_file(path)
            .with_context(|| format!("Failed to parse recipe: {}", path.display()))?
    } else if let Some(recipe) = builtin::lookup(spec) {
        recipe.with_context(|| format!("Builtin recipe {} is invalid", spec))?
    } else {
        anyhow::bail!(
            "No recipe file at {} and no builtin recipe by that name (builtins: {})",
            spec,
            builtin::BUILTIN_NAMES.join(", ")
        );
    };

    for warning in validate_recipe(&recipe).context("Recipe validation failed")? {
        println!("Warning: {}", warning);
    }

    Ok(recipe)
}

/// Turn CLI flags into build settings, filling gaps from the host
pub fn resolve_settings(args: &SettingsArgs, recipe: &Recipe) -> Result<BuildSettings> {
    let os: Os = match &args.os {
        Some(os) => os.parse()?,
        None => BuildSettings::detect()
            .context("Cannot detect host OS; pass --os")?
            .os,
    };
    let arch: Arch = match &args.arch {
        Some(arch) => arch.parse()?,
        None => BuildSettings::detect()
            .context("Cannot detect host architecture; pass --arch")?
            .arch,
    };
    let compiler: Compiler = match &args.compiler {
        Some(compiler) => compiler.parse()?,
        None => Compiler::default_for(os),
    };
    let build_type: BuildType = args.build_type.parse()?;

    let shared = if args.static_linkage {
        false
    } else if args.shared {
        true
    } else {
        recipe.options.shared
    };

    Ok(BuildSettings::new(os, compiler, build_type, arch, shared))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_recipe() {
        let recipe = load_recipe("libvault").unwrap();
        assert_eq!(recipe.package.name, "libvault");
    }

    #[test]
    fn test_load_unknown_recipe() {
        assert!(load_recipe("no-such-recipe").is_err());
    }

    #[test]
    fn test_resolve_explicit_settings() {
        let recipe = load_recipe("libvault").unwrap();
        let args = SettingsArgs {
            os: Some("linux".into()),
            compiler: Some("gcc".into()),
            build_type: "Release".into(),
            arch: Some("x86_64".into()),
            static_linkage: false,
            shared: false,
        };
        let settings = resolve_settings(&args, &recipe).unwrap();
        assert_eq!(
            settings,
            BuildSettings::new(Os::Linux, Compiler::Gcc, BuildType::Release, Arch::X86_64, true)
        );

        let static_args = SettingsArgs {
            static_linkage: true,
            ..args
        };
        assert!(!resolve_settings(&static_args, &recipe).unwrap().shared);
    }

    #[test]
    fn test_resolve_default_compiler() {
        let recipe = load_recipe("libvault").unwrap();
        let args = SettingsArgs {
            os: Some("windows".into()),
            arch: Some("x86_64".into()),
            build_type: "Debug".into(),
            ..Default::default()
        };
        let settings = resolve_settings(&args, &recipe).unwrap();
        assert_eq!(settings.compiler, Compiler::Msvc);
        assert_eq!(settings.build_type, BuildType::Debug);
    }

    #[test]
    fn test_resolve_bad_setting() {
        let recipe = load_recipe("libvault").unwrap();
        let args = SettingsArgs {
            os: Some("plan9".into()),
            arch: Some("x86_64".into()),
            build_type: "Release".into(),
            ..Default::default()
        };
        assert!(resolve_settings(&args, &recipe).is_err());
    }
}
