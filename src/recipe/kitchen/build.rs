// src/recipe/kitchen/build.rs

//! Build systems: configuring and compiling a fetched source tree
//!
//! Tool output is returned to the caller as-is. On failure the captured
//! stdout and stderr are embedded verbatim in the error.

use crate::error::{Error, Result};
use crate::recipe::kitchen::source::SourceLocation;
use crate::settings::{Arch, BuildSettings, Compiler, Os};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Directory holding a completed build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutputLocation(PathBuf);

impl BuildOutputLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Capability: drive an external build system
pub trait BuildSystem: Send + Sync {
    /// Build system name for logs
    fn name(&self) -> &str;

    /// Project file that must sit at the top of the source tree
    fn descriptor(&self) -> &str;

    /// Generate the build tree in `build_dir`
    ///
    /// Returns the tool's combined output.
    fn configure(
        &self,
        source: &SourceLocation,
        build_dir: &Path,
        settings: &BuildSettings,
        definitions: &BTreeMap<String, String>,
    ) -> Result<String>;

    /// Compile a configured build tree
    ///
    /// Returns the tool's combined output.
    fn compile(&self, build_dir: &Path, settings: &BuildSettings, jobs: u32) -> Result<String>;
}

/// Combine stdout and stderr without altering either
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Drives CMake through its command line
#[derive(Debug, Clone, Default)]
pub struct CMake {
    /// Explicit cmake binary; looked up on PATH when unset
    program: Option<PathBuf>,
}

impl CMake {
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
            None => which::which("cmake")
                .map_err(|e| Error::Configuration(format!("cmake not found in PATH: {}", e))),
        }
    }

    /// Arguments for the configure step
    pub fn configure_args(
        source: &Path,
        build_dir: &Path,
        settings: &BuildSettings,
        definitions: &BTreeMap<String, String>,
    ) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            source.to_string_lossy().into_owned(),
            "-B".to_string(),
            build_dir.to_string_lossy().into_owned(),
            format!("-DCMAKE_BUILD_TYPE={}", settings.build_type),
            format!(
                "-DBUILD_SHARED_LIBS={}",
                if settings.shared { "ON" } else { "OFF" }
            ),
        ];

        match (settings.os, settings.compiler) {
            (Os::Windows, Compiler::Msvc) => {
                let platform = match settings.arch {
                    Arch::X86 => "Win32",
                    Arch::X86_64 => "x64",
                    Arch::Armv7 => "ARM",
                    Arch::Armv8 => "ARM64",
                };
                args.push("-A".to_string());
                args.push(platform.to_string());
            }
            (Os::Macos, _) => {
                let arch = match settings.arch {
                    Arch::X86 => "i386",
                    Arch::X86_64 => "x86_64",
                    Arch::Armv7 => "armv7",
                    Arch::Armv8 => "arm64",
                };
                args.push(format!("-DCMAKE_OSX_ARCHITECTURES={}", arch));
            }
            (_, Compiler::Gcc | Compiler::Clang) if settings.arch == Arch::X86 => {
                args.push("-DCMAKE_C_FLAGS=-m32".to_string());
                args.push("-DCMAKE_CXX_FLAGS=-m32".to_string());
            }
            _ => {}
        }

        args.extend(definitions.iter().map(|(k, v)| format!("-D{}={}", k, v)));
        args
    }

    /// Arguments for the compile step
    pub fn build_args(build_dir: &Path, settings: &BuildSettings, jobs: u32) -> Vec<String> {
        vec![
            "--build".to_string(),
            build_dir.to_string_lossy().into_owned(),
            "--config".to_string(),
            settings.build_type.to_string(),
            "--parallel".to_string(),
            jobs.max(1).to_string(),
        ]
    }

    fn run(&self, args: &[String]) -> Result<Output> {
        let program = self.program()?;
        debug!("Running: {} {}", program.display(), args.join(" "));
        Command::new(&program)
            .args(args)
            .output()
            .map_err(|e| Error::Configuration(format!("Failed to run cmake: {}", e)))
    }
}

impl BuildSystem for CMake {
    fn name(&self) -> &str {
        "cmake"
    }

    fn descriptor(&self) -> &str {
        "CMakeLists.txt"
    }

    fn configure(
        &self,
        source: &SourceLocation,
        build_dir: &Path,
        settings: &BuildSettings,
        definitions: &BTreeMap<String, String>,
    ) -> Result<String> {
        let args = Self::configure_args(source.path(), build_dir, settings, definitions);
        let output = self.run(&args)?;
        let text = combined_output(&output);

        if !output.status.success() {
            return Err(Error::Configuration(format!(
                "cmake configure exited with {}\n{}",
                output.status, text
            )));
        }

        Ok(text)
    }

    fn compile(&self, build_dir: &Path, settings: &BuildSettings, jobs: u32) -> Result<String> {
        let args = Self::build_args(build_dir, settings, jobs);
        let output = self.run(&args)?;
        let text = combined_output(&output);

        if !output.status.success() {
            return Err(Error::Build(format!(
                "cmake --build exited with {}\n{}",
                output.status, text
            )));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BuildType;

    fn settings(os: Os, compiler: Compiler, arch: Arch, shared: bool) -> BuildSettings {
        BuildSettings::new(os, compiler, BuildType::Release, arch, shared)
    }

    #[test]
    fn test_configure_args_linux_shared() {
        let mut defs = BTreeMap::new();
        defs.insert("ENABLE_TEST".to_string(), "OFF".to_string());
        let args = CMake::configure_args(
            Path::new("/src/libvault"),
            Path::new("/build"),
            &settings(Os::Linux, Compiler::Gcc, Arch::X86_64, true),
            &defs,
        );
        assert_eq!(
            args,
            vec![
                "-S",
                "/src/libvault",
                "-B",
                "/build",
                "-DCMAKE_BUILD_TYPE=Release",
                "-DBUILD_SHARED_LIBS=ON",
                "-DENABLE_TEST=OFF",
            ]
        );
    }

    #[test]
    fn test_configure_args_static() {
        let args = CMake::configure_args(
            Path::new("/s"),
            Path::new("/b"),
            &settings(Os::Linux, Compiler::Clang, Arch::X86_64, false),
            &BTreeMap::new(),
        );
        assert!(args.contains(&"-DBUILD_SHARED_LIBS=OFF".to_string()));
    }

    #[test]
    fn test_configure_args_platforms() {
        let msvc = CMake::configure_args(
            Path::new("/s"),
            Path::new("/b"),
            &settings(Os::Windows, Compiler::Msvc, Arch::X86, true),
            &BTreeMap::new(),
        );
        assert!(msvc.windows(2).any(|w| w[0] == "-A" && w[1] == "Win32"));

        let mac = CMake::configure_args(
            Path::new("/s"),
            Path::new("/b"),
            &settings(Os::Macos, Compiler::AppleClang, Arch::Armv8, true),
            &BTreeMap::new(),
        );
        assert!(mac.contains(&"-DCMAKE_OSX_ARCHITECTURES=arm64".to_string()));

        let m32 = CMake::configure_args(
            Path::new("/s"),
            Path::new("/b"),
            &settings(Os::Linux, Compiler::Gcc, Arch::X86, true),
            &BTreeMap::new(),
        );
        assert!(m32.contains(&"-DCMAKE_CXX_FLAGS=-m32".to_string()));
    }

    #[test]
    fn test_build_args() {
        let args = CMake::build_args(
            Path::new("/b"),
            &settings(Os::Linux, Compiler::Gcc, Arch::X86_64, true),
            0,
        );
        assert_eq!(args, vec!["--build", "/b", "--config", "Release", "--parallel", "1"]);
    }

    #[test]
    fn test_missing_cmake_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let cmake = CMake::with_program("/nonexistent/bin/cmake");
        let result = cmake.configure(
            &SourceLocation::new(dir.path()),
            &dir.path().join("build"),
            &settings(Os::Linux, Compiler::Gcc, Arch::X86_64, true),
            &BTreeMap::new(),
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[cfg(unix)]
    fn fake_cmake(dir: &Path, body: &str) -> CMake {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("cmake");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        CMake::with_program(path)
    }

    #[cfg(unix)]
    #[test]
    fn test_configure_failure_is_configuration_error() {
        let tools = tempfile::tempdir().unwrap();
        let cmake = fake_cmake(
            tools.path(),
            "echo '-- The CXX compiler identification is GNU'\necho 'CMake Error: Could not find CURL' >&2\nexit 1",
        );
        let dir = tempfile::tempdir().unwrap();

        let err = cmake
            .configure(
                &SourceLocation::new(dir.path()),
                &dir.path().join("build"),
                &settings(Os::Linux, Compiler::Gcc, Arch::X86_64, true),
                &BTreeMap::new(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        let msg = err.to_string();
        assert!(msg.contains("-- The CXX compiler identification is GNU\n"));
        assert!(msg.ends_with("CMake Error: Could not find CURL\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_failure_passes_diagnostics_through() {
        let tools = tempfile::tempdir().unwrap();
        let cmake = fake_cmake(
            tools.path(),
            "printf \"main.cpp:3:1: error: expected ';' before '}' token\" >&2\nexit 2",
        );
        let dir = tempfile::tempdir().unwrap();

        let err = cmake
            .compile(
                dir.path(),
                &settings(Os::Linux, Compiler::Gcc, Arch::X86_64, true),
                4,
            )
            .unwrap_err();
        assert!(matches!(err, Error::Build(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("build failed: cmake --build exited with"));
        assert!(msg.ends_with("main.cpp:3:1: error: expected ';' before '}' token"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_tool_output_is_returned() {
        let tools = tempfile::tempdir().unwrap();
        let cmake = fake_cmake(tools.path(), "echo '[100%] Built target vault'");
        let dir = tempfile::tempdir().unwrap();

        let output = cmake
            .compile(
                dir.path(),
                &settings(Os::Linux, Compiler::Gcc, Arch::X86_64, true),
                4,
            )
            .unwrap();
        assert_eq!(output, "[100%] Built target vault\n");
    }
}
