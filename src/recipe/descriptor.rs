// src/recipe/descriptor.rs

//! Package descriptor and the manifest written next to staged artifacts

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::settings::BuildSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Name of the manifest file written into every package root
pub const MANIFEST_FILE: &str = "stockpot.toml";

/// Static package metadata, fixed for the lifetime of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    name: String,
    version: String,
    license: String,
    author: String,
    homepage_url: String,
    #[serde(default)]
    description: String,
    topics: BTreeSet<String>,
    link_libraries: Vec<String>,
}

/// Link information handed to downstream consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Names consumers pass to their linker
    pub libs: Vec<String>,
}

impl PackageDescriptor {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        let pkg = &recipe.package;
        Self {
            name: pkg.name.clone(),
            version: pkg.version.clone(),
            license: pkg.license.clone().unwrap_or_default(),
            author: pkg.author.clone().unwrap_or_default(),
            homepage_url: pkg.homepage.clone().unwrap_or_default(),
            description: pkg.description.clone().unwrap_or_default(),
            topics: pkg.topics.iter().cloned().collect(),
            link_libraries: recipe.package_info.libs.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn homepage_url(&self) -> &str {
        &self.homepage_url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn topics(&self) -> &BTreeSet<String> {
        &self.topics
    }

    pub fn link_libraries(&self) -> &[String] {
        &self.link_libraries
    }

    /// Link libraries for consumers. Does not depend on build settings.
    pub fn package_info(&self) -> PackageInfo {
        PackageInfo {
            libs: self.link_libraries.clone(),
        }
    }
}

/// A file staged into the package root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StagedFile {
    /// Path relative to the package root, `/`-separated
    pub path: String,
    pub sha256: String,
}

/// Everything a consumer needs to know about a built package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub package: PackageDescriptor,
    pub settings: BuildSettings,
    pub package_info: PackageInfo,
    #[serde(default)]
    pub files: Vec<StagedFile>,
}

impl PackageManifest {
    pub fn new(descriptor: &PackageDescriptor, settings: &BuildSettings, mut files: Vec<StagedFile>) -> Self {
        files.sort();
        files.dedup_by(|a, b| a.path == b.path);
        Self {
            package: descriptor.clone(),
            settings: settings.clone(),
            package_info: descriptor.package_info(),
            files,
        }
    }

    /// Write the manifest to `<package_root>/stockpot.toml`
    pub fn write(&self, package_root: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Collection(format!("Failed to serialize manifest: {}", e)))?;
        let path = package_root.join(MANIFEST_FILE);
        fs::write(&path, content).map_err(|e| {
            Error::Collection(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    /// Read a manifest back from a package root
    pub fn read(package_root: &Path) -> Result<Self> {
        let path = package_root.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Parse(format!("Invalid manifest {}: {}", path.display(), e)))
    }
}
