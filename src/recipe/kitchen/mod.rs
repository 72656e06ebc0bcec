// src/recipe/kitchen/mod.rs

//! Kitchen: where recipes are cooked
//!
//! The Kitchen owns the two external capabilities a cook needs, a
//! [`SourceProvider`] and a [`BuildSystem`], and exposes the four recipe
//! operations (`source`, `build`, `package`, `package_info`) plus `cook`,
//! which runs them back to back. Everything blocks; nothing runs
//! concurrently.

mod build;
mod collect;
mod config;
mod cook;
mod source;

pub use build::{BuildOutputLocation, BuildSystem, CMake};
pub use collect::{CollectReport, collect};
pub use config::{CookResult, KitchenConfig};
pub use cook::{Cook, CookStage};
pub use source::{
    AutoSource, GitSource, LocalSource, SourceLocation, SourceProvider, is_local_url,
    prepare_destination,
};

use crate::error::{Error, Result};
use crate::recipe::descriptor::{PackageDescriptor, PackageInfo, PackageManifest};
use crate::recipe::format::Recipe;
use crate::settings::BuildSettings;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{info, warn};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    config: KitchenConfig,
    source: Arc<dyn SourceProvider>,
    build_system: Arc<dyn BuildSystem>,
}

impl Kitchen {
    /// Create a Kitchen that builds with CMake
    ///
    /// Remote URLs are cloned with git; `file://` URLs and plain directories
    /// are copied.
    pub fn new(config: KitchenConfig) -> Self {
        Self::with_backends(config, Arc::new(AutoSource::new()), Arc::new(CMake::new()))
    }

    /// Create a Kitchen with substitute source and build backends
    pub fn with_backends(
        config: KitchenConfig,
        source: Arc<dyn SourceProvider>,
        build_system: Arc<dyn BuildSystem>,
    ) -> Self {
        Self {
            config,
            source,
            build_system,
        }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    pub fn source_provider(&self) -> &dyn SourceProvider {
        self.source.as_ref()
    }

    pub fn build_system(&self) -> &dyn BuildSystem {
        self.build_system.as_ref()
    }

    /// `source`: fetch the recipe's sources into `destination`
    pub fn source(&self, recipe: &Recipe, destination: &Path) -> Result<SourceLocation> {
        let url = recipe.source_url();
        info!("Fetching {} via {}", url, self.source.name());
        self.source
            .fetch(&url, recipe.source_rev().as_deref(), destination)
    }

    /// `build`: configure and compile a fetched source tree into `build_dir`
    pub fn build(
        &self,
        recipe: &Recipe,
        source: SourceLocation,
        settings: &BuildSettings,
        build_dir: &Path,
    ) -> Result<BuildOutputLocation> {
        let mut cook = Cook::from_source(self, recipe, settings, source);
        cook.configure(build_dir)?;
        cook.compile().cloned()
    }

    /// `package`: stage a completed build into `package_root`
    pub fn package(
        &self,
        recipe: &Recipe,
        source: SourceLocation,
        build_output: BuildOutputLocation,
        settings: &BuildSettings,
        package_root: &Path,
    ) -> Result<PackageManifest> {
        recipe.artifact_set().validate_for(settings)?;
        let mut cook = Cook::from_build(self, recipe, settings, source, build_output);
        cook.plate(package_root)
    }

    /// `package_info`: link libraries consumers must reference
    pub fn package_info(&self, recipe: &Recipe) -> PackageInfo {
        PackageDescriptor::from_recipe(recipe).package_info()
    }

    /// Cook a recipe from scratch into `package_root`
    ///
    /// Runs fetch, configure, compile and plate in order inside a fresh
    /// scratch directory. Any failure aborts the cook; `package_root` is
    /// only touched by the final stage.
    pub fn cook(
        &self,
        recipe: &Recipe,
        settings: &BuildSettings,
        package_root: &Path,
    ) -> Result<CookResult> {
        info!(
            "Cooking {} version {} for {}",
            recipe.package.name, recipe.package.version, settings
        );

        recipe.artifact_set().validate_for(settings)?;

        let scratch = match &self.config.work_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                TempDir::with_prefix_in(format!("{}-", recipe.package.name), dir)?
            }
            None => TempDir::with_prefix(format!("{}-", recipe.package.name))?,
        };

        let source_dir = scratch.path().join("source").join(recipe.source_folder());
        let build_dir = scratch.path().join("build");

        let mut cook = Cook::new(self, recipe, settings);
        let manifest = Self::run_stages(&mut cook, &source_dir, &build_dir, package_root);

        let kept = if self.config.keep_builddir {
            let path = scratch.keep();
            info!("Keeping build directory {}", path.display());
            Some(path)
        } else {
            None
        };

        let manifest = match manifest {
            Ok(m) => m,
            Err(e) => {
                if let Some(path) = &kept {
                    warn!("Cook failed; build directory kept at {}", path.display());
                }
                return Err(e);
            }
        };

        info!(
            "Cooked {} ({} files) into {}",
            recipe.package.name,
            manifest.files.len(),
            package_root.display()
        );

        Ok(CookResult {
            package_root: package_root.to_path_buf(),
            manifest,
            log: cook.into_log(),
            build_dir: kept,
        })
    }

    fn run_stages(
        cook: &mut Cook<'_>,
        source_dir: &Path,
        build_dir: &Path,
        package_root: &Path,
    ) -> Result<PackageManifest> {
        info!("Prep: fetching sources...");
        cook.fetch(source_dir)?;

        info!("Simmering: configuring and compiling...");
        cook.configure(build_dir)?;
        cook.compile()?;

        info!("Plating: staging artifacts...");
        cook.plate(package_root)
    }
}

/// Check that `path` names an existing directory, as a stage input
pub fn require_dir(path: &Path, what: &str) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "{} directory not found: {}",
            what,
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::builtin;
    use crate::settings::{Arch, BuildType, Compiler, Os};
    use std::collections::BTreeMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes a minimal source tree instead of cloning
    struct FakeSource {
        with_descriptor: bool,
    }

    impl SourceProvider for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        fn fetch(&self, _url: &str, _rev: Option<&str>, destination: &Path) -> Result<SourceLocation> {
            prepare_destination(destination)?;
            fs::create_dir_all(destination.join("include"))?;
            fs::write(destination.join("include/VaultClient.h"), "#pragma once\n")?;
            if self.with_descriptor {
                fs::write(destination.join("CMakeLists.txt"), "project(vault)\n")?;
            }
            Ok(SourceLocation::new(destination))
        }
    }

    /// Produces library files named after the linkage instead of compiling
    #[derive(Default)]
    struct FakeBuild {
        configured: AtomicUsize,
        fail_compile: bool,
    }

    impl BuildSystem for FakeBuild {
        fn name(&self) -> &str {
            "fake"
        }

        fn descriptor(&self) -> &str {
            "CMakeLists.txt"
        }

        fn configure(
            &self,
            _source: &SourceLocation,
            _build_dir: &Path,
            _settings: &BuildSettings,
            _definitions: &BTreeMap<String, String>,
        ) -> Result<String> {
            self.configured.fetch_add(1, Ordering::SeqCst);
            Ok("-- Configuring done\n".to_string())
        }

        fn compile(&self, build_dir: &Path, settings: &BuildSettings, _jobs: u32) -> Result<String> {
            if self.fail_compile {
                return Err(Error::Build("error: expected ';'\n".to_string()));
            }
            let name = if settings.shared { "libvault.so" } else { "libvault.a" };
            fs::write(build_dir.join(name), name)?;
            Ok("[100%] Built target vault\n".to_string())
        }
    }

    fn linux(shared: bool) -> BuildSettings {
        BuildSettings::new(Os::Linux, Compiler::Gcc, BuildType::Release, Arch::X86_64, shared)
    }

    fn kitchen(with_descriptor: bool, build: FakeBuild) -> Kitchen {
        Kitchen::with_backends(
            KitchenConfig::default(),
            Arc::new(FakeSource { with_descriptor }),
            Arc::new(build),
        )
    }

    #[test]
    fn test_cook_runs_all_stages() {
        let recipe = builtin::libvault().unwrap();
        let kitchen = kitchen(true, FakeBuild::default());
        let out = tempfile::tempdir().unwrap();

        let result = kitchen.cook(&recipe, &linux(true), out.path()).unwrap();
        assert!(out.path().join("include/VaultClient.h").is_file());
        assert!(out.path().join("lib/libvault.so").is_file());
        assert!(result.log.contains("=== configure ==="));
        assert!(result.log.contains("Built target vault"));
        assert!(result.build_dir.is_none());
    }

    #[test]
    fn test_cook_missing_descriptor_leaves_no_lib() {
        let recipe = builtin::libvault().unwrap();
        let build = FakeBuild::default();
        let kitchen = kitchen(false, build);
        let out = tempfile::tempdir().unwrap();
        let package_root = out.path().join("pkg");

        let err = kitchen.cook(&recipe, &linux(true), &package_root).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(!package_root.join("lib").exists());
    }

    #[test]
    fn test_compile_failure_passes_diagnostics_through() {
        let recipe = builtin::libvault().unwrap();
        let kitchen = kitchen(
            true,
            FakeBuild {
                fail_compile: true,
                ..Default::default()
            },
        );
        let out = tempfile::tempdir().unwrap();
        let err = kitchen.cook(&recipe, &linux(true), out.path()).unwrap_err();
        assert!(matches!(err, Error::Build(_)));
        assert!(err.to_string().contains("error: expected ';'"));
    }

    #[test]
    fn test_cook_stage_order_enforced() {
        let recipe = builtin::libvault().unwrap();
        let kitchen = kitchen(true, FakeBuild::default());
        let settings = linux(true);
        let mut cook = Cook::new(&kitchen, &recipe, &settings);

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            cook.configure(&dir.path().join("build")),
            Err(Error::InvalidStage { .. })
        ));
        assert_eq!(cook.stage(), CookStage::Unfetched);

        cook.fetch(&dir.path().join("src")).unwrap();
        assert_eq!(cook.stage(), CookStage::Fetched);
        assert!(cook.fetch(&dir.path().join("src2")).is_err());
        assert!(cook.compile().is_err());
    }

    #[test]
    fn test_failed_stage_poisons_cook() {
        let recipe = builtin::libvault().unwrap();
        let kitchen = kitchen(false, FakeBuild::default());
        let settings = linux(true);
        let mut cook = Cook::new(&kitchen, &recipe, &settings);
        let dir = tempfile::tempdir().unwrap();

        cook.fetch(&dir.path().join("src")).unwrap();
        assert!(cook.configure(&dir.path().join("build")).is_err());
        assert_eq!(cook.stage(), CookStage::Failed);
        assert!(cook.log().contains("=== configure failed (configuration) ==="));
        assert!(!dir.path().join("build").exists());
        assert!(cook.configure(&dir.path().join("build")).is_err());
    }

    #[test]
    fn test_separate_stage_operations() {
        let recipe = builtin::libvault().unwrap();
        let kitchen = kitchen(true, FakeBuild::default());
        let settings = linux(false);
        let dir = tempfile::tempdir().unwrap();

        let source = kitchen.source(&recipe, &dir.path().join("libvault")).unwrap();
        let build = kitchen
            .build(&recipe, source.clone(), &settings, &dir.path().join("build"))
            .unwrap();
        let manifest = kitchen
            .package(&recipe, source, build, &settings, &dir.path().join("pkg"))
            .unwrap();

        let paths: Vec<&str> = manifest.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["include/VaultClient.h", "lib/libvault.a"]);
        assert_eq!(kitchen.package_info(&recipe).libs, vec!["vault".to_string()]);
    }

    #[test]
    fn test_cook_keeps_builddir() {
        let recipe = builtin::libvault().unwrap();
        let work = tempfile::tempdir().unwrap();
        let kitchen = Kitchen::with_backends(
            KitchenConfig::keeping_builds_in(work.path()),
            Arc::new(FakeSource {
                with_descriptor: true,
            }),
            Arc::new(FakeBuild::default()),
        );
        let out = tempfile::tempdir().unwrap();
        let result = kitchen.cook(&recipe, &linux(true), out.path()).unwrap();
        let kept = result.build_dir.unwrap();
        assert!(kept.starts_with(work.path()));
        assert!(kept.join("source/libvault/CMakeLists.txt").is_file());
    }

    #[test]
    fn test_clean_refuses_package_root_holding_inputs() {
        let recipe = builtin::libvault().unwrap();
        let kitchen = Kitchen::with_backends(
            KitchenConfig {
                clean_package_root: true,
                ..Default::default()
            },
            Arc::new(FakeSource {
                with_descriptor: true,
            }),
            Arc::new(FakeBuild::default()),
        );
        let settings = linux(true);
        let dir = tempfile::tempdir().unwrap();
        let package_root = dir.path().join("pkg");

        let source = kitchen.source(&recipe, &package_root.join("src")).unwrap();
        let build = kitchen
            .build(&recipe, source.clone(), &settings, &package_root.join("build"))
            .unwrap();

        let err = kitchen
            .package(&recipe, source.clone(), build.clone(), &settings, &package_root)
            .unwrap_err();
        assert!(matches!(err, Error::Collection(_)));
        assert!(source.path().join("CMakeLists.txt").is_file());
        assert!(build.path().join("libvault.so").is_file());

        // A root that is the build directory itself is refused too
        let err = kitchen
            .package(&recipe, source, build.clone(), &settings, build.path())
            .unwrap_err();
        assert!(matches!(err, Error::Collection(_)));
        assert!(build.path().join("libvault.so").is_file());
    }

    #[test]
    fn test_default_kitchen_fetches_local_tree() {
        let origin = tempfile::tempdir().unwrap();
        fs::write(origin.path().join("CMakeLists.txt"), "project(vault)\n").unwrap();
        let mut recipe = builtin::libvault().unwrap();
        recipe.source.git = format!("file://{}", origin.path().display());

        let dir = tempfile::tempdir().unwrap();
        let location = Kitchen::with_defaults()
            .source(&recipe, &dir.path().join("libvault"))
            .unwrap();
        assert!(location.has_build_descriptor("CMakeLists.txt"));
    }

    #[test]
    fn test_require_dir() {
        let dir = tempfile::tempdir().unwrap();
        require_dir(dir.path(), "source").unwrap();
        assert!(require_dir(&dir.path().join("missing"), "source").is_err());
    }
}
