// src/recipe/kitchen/cook.rs

//! Cook: one run of a recipe through the stages
//!
//! Stages advance strictly in order:
//! `Unfetched -> Fetched -> Configured -> Built -> Packaged`.
//! A failed stage poisons the cook; start a new one to retry.

use crate::error::{Error, Result};
use crate::recipe::descriptor::{PackageDescriptor, PackageManifest};
use crate::recipe::format::Recipe;
use crate::recipe::kitchen::Kitchen;
use crate::recipe::kitchen::build::BuildOutputLocation;
use crate::recipe::kitchen::collect::collect;
use crate::recipe::kitchen::source::SourceLocation;
use crate::settings::BuildSettings;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where a cook is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookStage {
    Unfetched,
    Fetched,
    Configured,
    Built,
    Packaged,
    /// A stage failed; nothing more can run on this cook
    Failed,
}

impl CookStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookStage::Unfetched => "unfetched",
            CookStage::Fetched => "fetched",
            CookStage::Configured => "configured",
            CookStage::Built => "built",
            CookStage::Packaged => "packaged",
            CookStage::Failed => "failed",
        }
    }
}

impl fmt::Display for CookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cook operation
pub struct Cook<'a> {
    kitchen: &'a Kitchen,
    recipe: &'a Recipe,
    settings: &'a BuildSettings,
    stage: CookStage,
    source: Option<SourceLocation>,
    build_dir: Option<PathBuf>,
    build_output: Option<BuildOutputLocation>,
    log: String,
}

impl<'a> Cook<'a> {
    /// Start a cook from nothing
    pub fn new(kitchen: &'a Kitchen, recipe: &'a Recipe, settings: &'a BuildSettings) -> Self {
        Self {
            kitchen,
            recipe,
            settings,
            stage: CookStage::Unfetched,
            source: None,
            build_dir: None,
            build_output: None,
            log: String::new(),
        }
    }

    /// Resume from an already fetched source tree
    ///
    /// The caller vouches that the tree is intact.
    pub fn from_source(
        kitchen: &'a Kitchen,
        recipe: &'a Recipe,
        settings: &'a BuildSettings,
        source: SourceLocation,
    ) -> Self {
        let mut cook = Self::new(kitchen, recipe, settings);
        cook.source = Some(source);
        cook.stage = CookStage::Fetched;
        cook
    }

    /// Resume from a completed build
    pub fn from_build(
        kitchen: &'a Kitchen,
        recipe: &'a Recipe,
        settings: &'a BuildSettings,
        source: SourceLocation,
        build_output: BuildOutputLocation,
    ) -> Self {
        let mut cook = Self::from_source(kitchen, recipe, settings, source);
        cook.build_dir = Some(build_output.path().to_path_buf());
        cook.build_output = Some(build_output);
        cook.stage = CookStage::Built;
        cook
    }

    pub fn stage(&self) -> CookStage {
        self.stage
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn into_log(self) -> String {
        self.log
    }

    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }

    pub fn build_output(&self) -> Option<&BuildOutputLocation> {
        self.build_output.as_ref()
    }

    fn expect_stage(&self, expected: CookStage) -> Result<()> {
        if self.stage != expected {
            return Err(Error::InvalidStage {
                expected: expected.as_str(),
                actual: self.stage.as_str(),
            });
        }
        Ok(())
    }

    /// Record the outcome of `phase`, poisoning the cook on failure
    fn finish<T>(&mut self, phase: &str, next: CookStage, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => {
                debug!("Cook stage -> {}", next);
                self.stage = next;
            }
            Err(e) => {
                warn!("{} stage failed ({})", phase, e.kind());
                self.log_line(&format!("=== {} failed ({}) ===", phase, e.kind()));
                self.stage = CookStage::Failed;
            }
        }
        result
    }

    /// Stage 1: fetch the sources into `destination`
    pub fn fetch(&mut self, destination: &Path) -> Result<&SourceLocation> {
        self.expect_stage(CookStage::Unfetched)?;

        let url = self.recipe.source_url();
        let rev = self.recipe.source_rev();
        info!("Fetching {} via {}", url, self.kitchen.source_provider().name());

        let result = self
            .kitchen
            .source_provider()
            .fetch(&url, rev.as_deref(), destination);
        let location = self.finish("fetch", CookStage::Fetched, result)?;
        self.log_line(&format!("Fetched {} into {}", url, location.path().display()));
        Ok(&*self.source.insert(location))
    }

    /// Stage 2: configure the build tree in `build_dir`
    ///
    /// Fails without touching the disk when the source tree has no build descriptor.
    pub fn configure(&mut self, build_dir: &Path) -> Result<()> {
        self.expect_stage(CookStage::Fetched)?;
        let result = self.run_configure(build_dir);
        let output = self.finish("configure", CookStage::Configured, result)?;
        self.log_tool_output("configure", &output);
        self.build_dir = Some(build_dir.to_path_buf());
        Ok(())
    }

    fn run_configure(&self, build_dir: &Path) -> Result<String> {
        let system = self.kitchen.build_system();
        let source = self.source.as_ref().ok_or(Error::InvalidStage {
            expected: CookStage::Fetched.as_str(),
            actual: CookStage::Unfetched.as_str(),
        })?;

        if !source.has_build_descriptor(system.descriptor()) {
            return Err(Error::Configuration(format!(
                "{} not found in {}",
                system.descriptor(),
                source.path().display()
            )));
        }

        fs::create_dir_all(build_dir)?;
        info!(
            "Configuring {} with {} for {}",
            self.recipe.package.name,
            system.name(),
            self.settings
        );
        system.configure(source, build_dir, self.settings, &self.recipe.build.definitions)
    }

    /// Stage 3: compile the configured tree
    pub fn compile(&mut self) -> Result<&BuildOutputLocation> {
        self.expect_stage(CookStage::Configured)?;

        let jobs = self.recipe.build.jobs.unwrap_or(self.kitchen.config().jobs);
        let result = match &self.build_dir {
            Some(build_dir) => {
                info!("Compiling {} with {} job(s)", self.recipe.package.name, jobs);
                self.kitchen
                    .build_system()
                    .compile(build_dir, self.settings, jobs)
                    .map(|output| (BuildOutputLocation::new(build_dir), output))
            }
            None => Err(Error::InvalidStage {
                expected: CookStage::Configured.as_str(),
                actual: CookStage::Fetched.as_str(),
            }),
        };

        let (location, output) = self.finish("build", CookStage::Built, result)?;
        self.log_tool_output("build", &output);
        Ok(&*self.build_output.insert(location))
    }

    /// Stage 4: stage artifacts into `package_root` and write the manifest
    pub fn plate(&mut self, package_root: &Path) -> Result<PackageManifest> {
        self.expect_stage(CookStage::Built)?;
        let result = self.run_plate(package_root);
        let manifest = self.finish("package", CookStage::Packaged, result)?;
        self.log_line(&format!(
            "Packaged {} file(s) into {}",
            manifest.files.len(),
            package_root.display()
        ));
        Ok(manifest)
    }

    fn run_plate(&self, package_root: &Path) -> Result<PackageManifest> {
        let (Some(source), Some(build_output)) = (&self.source, &self.build_output) else {
            return Err(Error::InvalidStage {
                expected: CookStage::Built.as_str(),
                actual: self.stage.as_str(),
            });
        };

        if self.kitchen.config().clean_package_root && package_root.exists() {
            for (what, input) in [("source", source.path()), ("build", build_output.path())] {
                if same_or_inside(input, package_root) {
                    return Err(Error::Collection(format!(
                        "Refusing to clean {}: it contains the {} directory {}",
                        package_root.display(),
                        what,
                        input.display()
                    )));
                }
            }
            info!("Cleaning package root {}", package_root.display());
            fs::remove_dir_all(package_root).map_err(|e| {
                Error::Collection(format!("Cannot clean {}: {}", package_root.display(), e))
            })?;
        }

        let artifacts = self.recipe.artifact_set();
        let report = collect(build_output, source, &artifacts, package_root, self.settings)?;
        for rule in &report.unmatched {
            debug!("Rule {} '{}' matched nothing", rule.kind, rule.pattern);
        }

        let descriptor = PackageDescriptor::from_recipe(self.recipe);
        let manifest = PackageManifest::new(&descriptor, self.settings, report.staged);
        manifest.write(package_root)?;
        Ok(manifest)
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log raw tool output under a phase header
    fn log_tool_output(&mut self, phase: &str, output: &str) {
        self.log_line(&format!("=== {} ===", phase));
        if !output.is_empty() {
            self.log.push_str(output);
            if !output.ends_with('\n') {
                self.log.push('\n');
            }
        }
    }
}

/// Whether `path` is `root` or lies beneath it, after resolving symlinks where possible
fn same_or_inside(path: &Path, root: &Path) -> bool {
    let resolve = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    resolve(path).starts_with(resolve(root))
}
