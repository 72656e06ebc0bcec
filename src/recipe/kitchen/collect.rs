// src/recipe/kitchen/collect.rs

//! Staging build outputs into the package layout
//!
//! Matches are flattened: `build/src/lib/libvault.so` lands at
//! `lib/libvault.so`. When two matches share a file name the later one in
//! walk order wins, and existing files in the package root are overwritten
//! without warning.

use crate::error::{Error, Result};
use crate::hash::sha256_file;
use crate::recipe::artifacts::{ArtifactRoot, ArtifactRule, ArtifactSet, MATCH_OPTIONS};
use crate::recipe::descriptor::StagedFile;
use crate::recipe::kitchen::build::BuildOutputLocation;
use crate::recipe::kitchen::source::SourceLocation;
use crate::settings::BuildSettings;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Outcome of a collection pass
#[derive(Debug, Default, Clone)]
pub struct CollectReport {
    /// Files now present in the package root, sorted by path
    pub staged: Vec<StagedFile>,
    /// Active rules that matched nothing
    pub unmatched: Vec<ArtifactRule>,
}

/// Create `package_root` if needed and prove it is writable
fn ensure_writable(package_root: &Path) -> Result<()> {
    fs::create_dir_all(package_root).map_err(|e| {
        Error::Collection(format!("Cannot create {}: {}", package_root.display(), e))
    })?;

    tempfile::NamedTempFile::new_in(package_root)
        .map(drop)
        .map_err(|e| {
            Error::Collection(format!("{} is not writable: {}", package_root.display(), e))
        })
}

/// `/`-separated relative path, used for glob matching and manifests
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Files under `root` whose relative path matches `rule`, in sorted walk order
fn matching_files(root: &Path, rule: &ArtifactRule, skip: &Path) -> Result<Vec<PathBuf>> {
    let pattern = rule.compile()?;
    let mut matches = Vec::new();

    if !root.is_dir() {
        debug!("Artifact root {} does not exist", root.display());
        return Ok(matches);
    }

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != skip)
    {
        // An unreadable directory may hide an artifact; don't report it as unbuilt
        let entry = entry.map_err(|e| {
            Error::Collection(format!("Cannot walk {}: {}", root.display(), e))
        })?;
        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if pattern.matches_with(&slash_path(relative), MATCH_OPTIONS) {
            matches.push(entry.into_path());
        }
    }

    Ok(matches)
}

/// Copy every artifact that applies to `settings` into `package_root`
///
/// Rules that match nothing are reported, not failed: several kinds only
/// exist on some platforms. Fails only when `package_root` cannot be
/// created or written.
pub fn collect(
    build_output: &BuildOutputLocation,
    source: &SourceLocation,
    artifacts: &ArtifactSet,
    package_root: &Path,
    settings: &BuildSettings,
) -> Result<CollectReport> {
    ensure_writable(package_root)?;

    let mut staged: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut report = CollectReport::default();

    for rule in artifacts.active_rules(settings) {
        let root = match rule.root() {
            ArtifactRoot::Source => source.path(),
            ArtifactRoot::Build => build_output.path(),
        };

        let files = matching_files(root, rule, package_root)?;
        if files.is_empty() {
            debug!("No files matched {} pattern '{}'", rule.kind, rule.pattern);
            report.unmatched.push(rule.clone());
            continue;
        }

        let dest_dir = package_root.join(rule.kind.destination());
        fs::create_dir_all(&dest_dir).map_err(|e| {
            Error::Collection(format!("Cannot create {}: {}", dest_dir.display(), e))
        })?;

        for file in files {
            let Some(name) = file.file_name() else {
                continue;
            };
            let dest = dest_dir.join(name);
            fs::copy(&file, &dest).map_err(|e| {
                Error::Collection(format!(
                    "Failed to copy {} to {}: {}",
                    file.display(),
                    dest.display(),
                    e
                ))
            })?;
            debug!("Staged {} -> {}", file.display(), dest.display());

            let relative = Path::new(rule.kind.destination()).join(name);
            staged.insert(slash_path(&relative), dest);
        }
    }

    for (path, dest) in staged {
        let sha256 = sha256_file(&dest).map_err(|e| {
            Error::Collection(format!("Failed to hash {}: {}", dest.display(), e))
        })?;
        report.staged.push(StagedFile { path, sha256 });
    }

    info!(
        "Staged {} file(s) into {}",
        report.staged.len(),
        package_root.display()
    );

    Ok(report)
}
