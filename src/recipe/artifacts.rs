// src/recipe/artifacts.rs

//! Artifact kinds and the rules that select them from a build
//!
//! Each rule maps an [`ArtifactKind`] to a glob pattern. Patterns are
//! matched against paths relative to the rule's root, and `*` crosses
//! directory separators, so `*.so` finds a shared object anywhere in the
//! build tree.

use crate::error::{Error, Result};
use crate::settings::{BuildSettings, Os};
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of file staged into a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Public header
    Header,
    /// Static archive (`.a`)
    StaticArchive,
    /// ELF shared object (`.so`)
    SharedObject,
    /// Mach-O dynamic library (`.dylib`)
    DynamicLibrary,
    /// Windows static or import library (`.lib`)
    ImportLibrary,
    /// Windows runtime library (`.dll`)
    RuntimeLibrary,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Header => "header",
            ArtifactKind::StaticArchive => "static_archive",
            ArtifactKind::SharedObject => "shared_object",
            ArtifactKind::DynamicLibrary => "dynamic_library",
            ArtifactKind::ImportLibrary => "import_library",
            ArtifactKind::RuntimeLibrary => "runtime_library",
        }
    }

    /// Package subdirectory this kind is staged into
    pub fn destination(&self) -> &'static str {
        match self {
            ArtifactKind::Header => "include",
            ArtifactKind::RuntimeLibrary => "bin",
            ArtifactKind::StaticArchive
            | ArtifactKind::SharedObject
            | ArtifactKind::DynamicLibrary
            | ArtifactKind::ImportLibrary => "lib",
        }
    }

    /// Where matches are searched when a rule does not say
    pub fn default_root(&self) -> ArtifactRoot {
        match self {
            ArtifactKind::Header => ArtifactRoot::Source,
            _ => ArtifactRoot::Build,
        }
    }

    /// Whether this kind belongs in a package built with `settings`
    pub fn applies_to(&self, settings: &BuildSettings) -> bool {
        match self {
            ArtifactKind::Header => true,
            ArtifactKind::StaticArchive => !settings.shared && settings.os != Os::Windows,
            ArtifactKind::SharedObject => {
                settings.shared && matches!(settings.os, Os::Linux | Os::FreeBsd)
            }
            ArtifactKind::DynamicLibrary => settings.shared && settings.os == Os::Macos,
            ArtifactKind::ImportLibrary => settings.os == Os::Windows,
            ArtifactKind::RuntimeLibrary => {
                settings.shared && settings.os.splits_runtime_libraries()
            }
        }
    }

    /// Kinds a package must be able to produce for `settings`
    pub fn required_for(settings: &BuildSettings) -> Vec<ArtifactKind> {
        let mut kinds = vec![ArtifactKind::Header];
        match (settings.os, settings.shared) {
            (Os::Windows, true) => {
                kinds.push(ArtifactKind::ImportLibrary);
                kinds.push(ArtifactKind::RuntimeLibrary);
            }
            (Os::Windows, false) => kinds.push(ArtifactKind::ImportLibrary),
            (Os::Macos, true) => kinds.push(ArtifactKind::DynamicLibrary),
            (Os::Linux | Os::FreeBsd, true) => kinds.push(ArtifactKind::SharedObject),
            (_, false) => kinds.push(ArtifactKind::StaticArchive),
        }
        kinds
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tree a rule's pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactRoot {
    /// The fetched source folder
    Source,
    /// The build output directory
    Build,
}

/// One `kind → pattern` mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRule {
    pub kind: ArtifactKind,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<ArtifactRoot>,
}

impl ArtifactRule {
    pub fn new(kind: ArtifactKind, pattern: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
            root: None,
        }
    }

    pub fn root(&self) -> ArtifactRoot {
        self.root.unwrap_or_else(|| self.kind.default_root())
    }

    /// Compile the glob pattern
    pub fn compile(&self) -> Result<Pattern> {
        Pattern::new(&self.pattern).map_err(|e| {
            Error::Configuration(format!(
                "invalid {} pattern '{}': {}",
                self.kind, self.pattern, e
            ))
        })
    }
}

/// Options used for every artifact match
pub(crate) const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// The set of rules selecting a package's outputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    rules: Vec<ArtifactRule>,
}

impl ArtifactSet {
    pub fn new(rules: Vec<ArtifactRule>) -> Self {
        Self { rules }
    }

    /// Standard rules for a library named `lib` with an optional public header
    ///
    /// Library patterns match anywhere in the build output; the header is
    /// taken from the source folder.
    pub fn for_library(lib: &str, header: Option<&str>) -> Self {
        let mut rules = Vec::new();
        if let Some(header) = header {
            rules.push(ArtifactRule::new(ArtifactKind::Header, header));
        }
        rules.extend([
            ArtifactRule::new(ArtifactKind::ImportLibrary, format!("*lib{}.lib", lib)),
            ArtifactRule::new(ArtifactKind::RuntimeLibrary, "*.dll"),
            ArtifactRule::new(ArtifactKind::SharedObject, "*.so"),
            ArtifactRule::new(ArtifactKind::DynamicLibrary, "*.dylib"),
            ArtifactRule::new(ArtifactKind::StaticArchive, "*.a"),
        ]);
        Self { rules }
    }

    pub fn rules(&self) -> &[ArtifactRule] {
        &self.rules
    }

    /// Rules that apply to `settings`, in declaration order
    pub fn active_rules(&self, settings: &BuildSettings) -> Vec<&ArtifactRule> {
        self.rules
            .iter()
            .filter(|rule| rule.kind.applies_to(settings))
            .collect()
    }

    /// Check that the set can produce a usable package for `settings`
    ///
    /// Every pattern must compile, and every kind the platform needs
    /// (header plus the link-time library form) must have a rule.
    pub fn validate_for(&self, settings: &BuildSettings) -> Result<()> {
        for rule in &self.rules {
            rule.compile()?;
        }

        let missing: Vec<&str> = ArtifactKind::required_for(settings)
            .into_iter()
            .filter(|kind| !self.rules.iter().any(|rule| rule.kind == *kind))
            .map(|kind| kind.as_str())
            .collect();

        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "no artifact rule for {} on {}",
                missing.join(", "),
                settings
            )));
        }

        Ok(())
    }
}
