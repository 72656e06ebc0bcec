// src/recipe/kitchen/source.rs

//! Source providers: getting a library's source tree onto disk
//!
//! Providers never retry and never clean up after a failed fetch. A
//! destination that already holds files is refused rather than merged.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

/// A fetched source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation(PathBuf);

impl SourceLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Whether the tree contains the build system's project file at its top level
    pub fn has_build_descriptor(&self, descriptor: &str) -> bool {
        self.0.join(descriptor).is_file()
    }
}

/// Capability: retrieve a named upstream repository into a directory
pub trait SourceProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Retrieve `url` (optionally at `rev`) into `destination`
    ///
    /// `destination` is created when absent. An existing non-empty
    /// destination is a [`Error::Fetch`].
    fn fetch(&self, url: &str, rev: Option<&str>, destination: &Path) -> Result<SourceLocation>;
}

/// Make sure `destination` exists and is empty
pub fn prepare_destination(destination: &Path) -> Result<()> {
    if destination.exists() {
        if !destination.is_dir() {
            return Err(Error::Fetch(format!(
                "Destination is not a directory: {}",
                destination.display()
            )));
        }
        let mut entries = fs::read_dir(destination).map_err(|e| {
            Error::Fetch(format!("Cannot read {}: {}", destination.display(), e))
        })?;
        if entries.next().is_some() {
            return Err(Error::Fetch(format!(
                "Destination already contains files: {}",
                destination.display()
            )));
        }
        return Ok(());
    }

    fs::create_dir_all(destination).map_err(|e| {
        Error::Fetch(format!("Cannot create {}: {}", destination.display(), e))
    })
}

/// Clones with the `git` command line tool
#[derive(Debug, Clone, Default)]
pub struct GitSource {
    /// Explicit git binary; looked up on PATH when unset
    program: Option<PathBuf>,
}

impl GitSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    fn program(&self) -> Result<PathBuf> {
        match &self.program {
            Some(p) => Ok(p.clone()),
            None => which::which("git")
                .map_err(|e| Error::Fetch(format!("git not found in PATH: {}", e))),
        }
    }

    fn run(&self, args: &[&OsStr]) -> Result<()> {
        let program = self.program()?;
        let shown: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
        debug!("Running: {} {}", program.display(), shown.join(" "));

        let output = Command::new(&program)
            .args(args)
            .output()
            .map_err(|e| Error::Fetch(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Fetch(format!(
                "git {} exited with {}\n{}",
                args.first().map(|a| a.to_string_lossy()).unwrap_or_default(),
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }
}

impl SourceProvider for GitSource {
    fn name(&self) -> &str {
        "git"
    }

    fn fetch(&self, url: &str, rev: Option<&str>, destination: &Path) -> Result<SourceLocation> {
        prepare_destination(destination)?;

        let dest = destination.as_os_str();
        info!("Cloning {} into {}", url, destination.display());
        self.run(&[OsStr::new("clone"), OsStr::new("--quiet"), OsStr::new(url), dest])?;

        if let Some(rev) = rev {
            info!("Checking out {}", rev);
            self.run(&[
                OsStr::new("-C"),
                dest,
                OsStr::new("checkout"),
                OsStr::new("--quiet"),
                OsStr::new(rev),
            ])?;
        }

        Ok(SourceLocation::new(destination))
    }
}

/// Copies a source tree that is already on disk
///
/// Accepts plain paths and `file://` URLs. Revisions are ignored.
#[derive(Debug, Clone, Default)]
pub struct LocalSource;

impl LocalSource {
    pub fn new() -> Self {
        Self
    }
}

impl SourceProvider for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    fn fetch(&self, url: &str, rev: Option<&str>, destination: &Path) -> Result<SourceLocation> {
        let origin = Path::new(url.strip_prefix("file://").unwrap_or(url));
        if !origin.is_dir() {
            return Err(Error::Fetch(format!(
                "Source directory not found: {}",
                origin.display()
            )));
        }
        if rev.is_some() {
            debug!("Ignoring revision for local source {}", origin.display());
        }

        prepare_destination(destination)?;
        info!("Copying {} into {}", origin.display(), destination.display());

        for entry in WalkDir::new(origin).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Fetch(format!("Cannot walk source: {}", e)))?;
            let relative = entry
                .path()
                .strip_prefix(origin)
                .map_err(|e| Error::Fetch(e.to_string()))?;
            if relative.as_os_str().is_empty() {
                continue;
            }

            let target = destination.join(relative);
            let copied = if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
            } else {
                fs::copy(entry.path(), &target).map(|_| ())
            };
            copied.map_err(|e| {
                Error::Fetch(format!("Failed to copy {}: {}", entry.path().display(), e))
            })?;
        }

        Ok(SourceLocation::new(destination))
    }
}

/// Whether `url` names a tree on local disk rather than a git remote
///
/// `file://` URLs always do. A plain path does when it is an existing
/// directory that is not itself a git checkout.
pub fn is_local_url(url: &str) -> bool {
    if url.starts_with("file://") {
        return true;
    }
    let path = Path::new(url);
    path.is_dir() && !path.join(".git").exists()
}

/// Picks [`LocalSource`] or [`GitSource`] per URL
#[derive(Debug, Clone, Default)]
pub struct AutoSource {
    git: GitSource,
    local: LocalSource,
}

impl AutoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `git` for remote URLs
    pub fn with_git(git: GitSource) -> Self {
        Self {
            git,
            local: LocalSource::new(),
        }
    }

    fn provider_for(&self, url: &str) -> &dyn SourceProvider {
        if is_local_url(url) {
            &self.local
        } else {
            &self.git
        }
    }
}

impl SourceProvider for AutoSource {
    fn name(&self) -> &str {
        "auto"
    }

    fn fetch(&self, url: &str, rev: Option<&str>, destination: &Path) -> Result<SourceLocation> {
        let provider = self.provider_for(url);
        debug!("Fetching {} with the {} provider", url, provider.name());
        provider.fetch(url, rev, destination)
    }
}
