// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files describing where a library's sources live, how
//! its build system is driven, which build outputs make up the package and
//! which link libraries consumers must reference.

use crate::recipe::artifacts::{ArtifactRule, ArtifactSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete recipe for packaging one library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Where the sources come from
    pub source: SourceSection,

    /// Build system invocation
    #[serde(default)]
    pub build: BuildSection,

    /// Default option values
    #[serde(default)]
    pub options: OptionsSection,

    /// Explicit artifact rules; empty means "derive from package_info"
    #[serde(default)]
    pub artifacts: Vec<ArtifactRule>,

    /// What downstream consumers link against
    pub package_info: PackageInfoSection,
}

impl Recipe {
    /// Substitute variables in a string
    ///
    /// Replaces `%(name)s` and `%(version)s` with the package's values.
    pub fn substitute(&self, template: &str) -> String {
        template
            .replace("%(version)s", &self.package.version)
            .replace("%(name)s", &self.package.name)
    }

    /// Source URL with variables substituted
    pub fn source_url(&self) -> String {
        self.substitute(&self.source.git)
    }

    /// Revision to check out after cloning, if any
    pub fn source_rev(&self) -> Option<String> {
        self.source.rev.as_deref().map(|r| self.substitute(r))
    }

    /// Directory name the sources are fetched into
    pub fn source_folder(&self) -> &str {
        self.source.folder.as_deref().unwrap_or(&self.package.name)
    }

    /// The artifact set this recipe packages
    ///
    /// Explicit `[[artifacts]]` win. Otherwise the set is derived from the
    /// first link library and the declared public header.
    pub fn artifact_set(&self) -> ArtifactSet {
        if !self.artifacts.is_empty() {
            return ArtifactSet::new(self.artifacts.clone());
        }

        let lib = self
            .package_info
            .libs
            .first()
            .map(String::as_str)
            .unwrap_or(&self.package.name);
        ArtifactSet::for_library(lib, self.package_info.header.as_deref())
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version (semantic version)
    pub version: String,

    /// SPDX license identifier
    #[serde(default)]
    pub license: Option<String>,

    /// Author contact
    #[serde(default)]
    pub author: Option<String>,

    /// Project homepage
    #[serde(default)]
    pub homepage: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Topic tags
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Source retrieval section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Repository URL (git remote, `file://` URL or local path)
    pub git: String,

    /// Folder name the repository is fetched into (defaults to the package name)
    #[serde(default)]
    pub folder: Option<String>,

    /// Branch, tag or commit to check out
    #[serde(default)]
    pub rev: Option<String>,
}

/// Build system section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    /// Build system driving the compile
    #[serde(default = "default_build_system")]
    pub system: String,

    /// Extra `-D` cache definitions passed at configure time
    #[serde(default)]
    pub definitions: BTreeMap<String, String>,

    /// Parallel jobs override
    #[serde(default)]
    pub jobs: Option<u32>,
}

fn default_build_system() -> String {
    "cmake".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            system: default_build_system(),
            definitions: BTreeMap::new(),
            jobs: None,
        }
    }
}

/// Default option values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsSection {
    /// Build shared libraries by default
    #[serde(default = "default_shared")]
    pub shared: bool,
}

fn default_shared() -> bool {
    true
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            shared: default_shared(),
        }
    }
}

/// Consumer-facing link information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageInfoSection {
    /// Library names consumers pass to their linker
    pub libs: Vec<String>,

    /// Public header, relative to the source folder
    #[serde(default)]
    pub header: Option<String>,
}
