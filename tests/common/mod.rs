// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockpot::recipe::{BuildSystem, LocalSource, SourceLocation};
use stockpot::{Arch, BuildSettings, BuildType, Compiler, Kitchen, KitchenConfig, Os, Result};
use tempfile::TempDir;

/// Create a libvault-shaped source tree.
///
/// Returns (TempDir, path) - keep the TempDir alive to prevent cleanup.
pub fn libvault_tree(with_descriptor: bool) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("upstream");
    fs::create_dir_all(root.join("include")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("include/VaultClient.h"),
        "#pragma once\nnamespace Vault { class Client; }\n",
    )
    .unwrap();
    fs::write(root.join("src/VaultClient.cpp"), "#include \"VaultClient.h\"\n").unwrap();
    if with_descriptor {
        fs::write(
            root.join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.12)\nproject(vault)\n",
        )
        .unwrap();
    }
    (dir, root)
}

/// Stands in for CMake: lays out library files the way a real build would
#[derive(Default)]
pub struct FakeCMake;

impl BuildSystem for FakeCMake {
    fn name(&self) -> &str {
        "fake-cmake"
    }

    fn descriptor(&self) -> &str {
        "CMakeLists.txt"
    }

    fn configure(
        &self,
        source: &SourceLocation,
        build_dir: &Path,
        settings: &BuildSettings,
        _definitions: &BTreeMap<String, String>,
    ) -> Result<String> {
        fs::write(
            build_dir.join("CMakeCache.txt"),
            format!("CMAKE_HOME_DIRECTORY={}\n", source.path().display()),
        )?;
        Ok(format!("-- Configuring done for {}\n", settings))
    }

    fn compile(&self, build_dir: &Path, settings: &BuildSettings, _jobs: u32) -> Result<String> {
        let out = build_dir.join("src");
        fs::create_dir_all(&out)?;
        let files: &[&str] = match (settings.os, settings.shared) {
            (Os::Windows, true) => &["libvault.lib", "vault.dll"],
            (Os::Windows, false) => &["libvault.lib"],
            (Os::Macos, true) => &["libvault.dylib"],
            (_, true) => &["libvault.so"],
            (_, false) => &["libvault.a"],
        };
        for name in files {
            fs::write(out.join(name), format!("{} {}", name, settings))?;
        }
        Ok("[100%] Built target vault\n".to_string())
    }
}

/// Kitchen that copies sources from disk and fakes the compile
pub fn test_kitchen() -> Kitchen {
    Kitchen::with_backends(
        KitchenConfig::default(),
        Arc::new(LocalSource::new()),
        Arc::new(FakeCMake),
    )
}

pub fn settings(os: Os, shared: bool) -> BuildSettings {
    BuildSettings::new(
        os,
        Compiler::default_for(os),
        BuildType::Release,
        Arch::X86_64,
        shared,
    )
}

/// Every file under `root`, relative and sorted
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
