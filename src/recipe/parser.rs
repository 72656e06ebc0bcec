// src/recipe/parser.rs

//! Recipe file parsing

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use std::path::Path;

/// Build systems the kitchen knows how to drive
pub const SUPPORTED_BUILD_SYSTEMS: &[&str] = &["cmake"];

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::Parse(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Parse(format!("Failed to read recipe file {}: {}", path.display(), e))
    })?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Returns warnings for missing optional metadata; structural problems are errors.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::Parse("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::Parse("Recipe package version cannot be empty".to_string()));
    }
    if let Err(e) = semver::Version::parse(&recipe.package.version) {
        return Err(Error::Parse(format!(
            "Recipe version '{}' is not a semantic version: {}",
            recipe.package.version, e
        )));
    }

    if recipe.source.git.trim().is_empty() {
        return Err(Error::Parse("Recipe source URL cannot be empty".to_string()));
    }
    if recipe.source_folder().contains(['/', '\\']) || recipe.source_folder() == ".." {
        return Err(Error::Parse(format!(
            "Source folder must be a single path component: {}",
            recipe.source_folder()
        )));
    }

    if !SUPPORTED_BUILD_SYSTEMS.contains(&recipe.build.system.as_str()) {
        return Err(Error::Parse(format!(
            "Unsupported build system: {} (supported: {})",
            recipe.build.system,
            SUPPORTED_BUILD_SYSTEMS.join(", ")
        )));
    }

    if recipe.package_info.libs.is_empty() {
        return Err(Error::Parse(
            "Recipe must declare at least one link library in [package_info] libs".to_string(),
        ));
    }
    if recipe.package_info.libs.iter().any(|lib| lib.trim().is_empty()) {
        return Err(Error::Parse("Link library names cannot be empty".to_string()));
    }

    for rule in recipe.artifact_set().rules() {
        rule.compile()
            .map_err(|e| Error::Parse(format!("Invalid artifact rule: {}", e)))?;
    }

    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.author.is_none() {
        warnings.push("Missing package author".to_string());
    }
    if recipe.package.homepage.is_none() {
        warnings.push("Missing package homepage".to_string());
    }
    if recipe.package.topics.is_empty() {
        warnings.push("No topics specified".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
[package]
name = "test"
version = "1.0.0"

[source]
git = "https://example.com/test.git"

[package_info]
libs = ["test"]
header = "include/test.h"
"#;

    #[test]
    fn test_parse_valid_recipe() {
        let recipe = parse_recipe(VALID).unwrap();
        assert_eq!(recipe.package.name, "test");
        assert_eq!(recipe.package_info.libs, vec!["test".to_string()]);
    }

    #[test]
    fn test_parse_invalid_recipe() {
        let content = "this is not valid toml at all {}";
        assert!(matches!(parse_recipe(content), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_recipe_file(Path::new("/nonexistent/recipe.toml"));
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_validate_warnings() {
        let recipe = parse_recipe(VALID).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("license")));
        assert!(warnings.iter().any(|w| w.contains("author")));
        assert!(warnings.iter().any(|w| w.contains("homepage")));
        assert!(warnings.iter().any(|w| w.contains("topics")));
    }

    #[test]
    fn test_validate_empty_name() {
        let mut recipe = parse_recipe(VALID).unwrap();
        recipe.package.name.clear();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_version() {
        let mut recipe = parse_recipe(VALID).unwrap();
        recipe.package.version = "one".to_string();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_no_libs() {
        let mut recipe = parse_recipe(VALID).unwrap();
        recipe.package_info.libs.clear();
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(err.to_string().contains("link library"));
    }

    #[test]
    fn test_validate_unknown_build_system() {
        let mut recipe = parse_recipe(VALID).unwrap();
        recipe.build.system = "scons".to_string();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_nested_folder() {
        let mut recipe = parse_recipe(VALID).unwrap();
        recipe.source.folder = Some("a/b".to_string());
        assert!(validate_recipe(&recipe).is_err());
    }
}
