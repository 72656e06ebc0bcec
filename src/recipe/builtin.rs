// src/recipe/builtin.rs

//! Recipes shipped inside the binary

use crate::error::Result;
use crate::recipe::format::Recipe;
use crate::recipe::parser::parse_recipe;

const LIBVAULT: &str = include_str!("../../recipes/libvault.toml");

/// Names accepted by [`lookup`]
pub const BUILTIN_NAMES: &[&str] = &["libvault"];

/// The libvault recipe
pub fn libvault() -> Result<Recipe> {
    parse_recipe(LIBVAULT)
}

/// Look up a builtin recipe by name
pub fn lookup(name: &str) -> Option<Result<Recipe>> {
    match name {
        "libvault" => Some(libvault()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::validate_recipe;

    #[test]
    fn test_libvault_parses_and_validates() {
        let recipe = libvault().unwrap();
        assert_eq!(recipe.package.name, "libvault");
        assert_eq!(recipe.source_url(), "https://github.com/abedra/libvault.git");
        assert_eq!(recipe.source_folder(), "libvault");
        assert!(recipe.options.shared);
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_lookup() {
        assert!(lookup("libvault").is_some());
        assert!(lookup("libfoo").is_none());
        for name in BUILTIN_NAMES {
            assert!(lookup(name).unwrap().is_ok());
        }
    }
}
