// src/settings.rs

//! Build settings threaded through every cook stage
//!
//! A `BuildSettings` value is constructed once per invocation (from CLI
//! flags or host detection) and passed by reference to each stage. Nothing
//! reads settings from global state.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Macos,
    Windows,
    FreeBsd,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Macos => "macos",
            Os::Windows => "windows",
            Os::FreeBsd => "freebsd",
        }
    }

    /// Whether runtime libraries live apart from link-time libraries (`bin/` vs `lib/`)
    pub fn splits_runtime_libraries(&self) -> bool {
        matches!(self, Os::Windows)
    }

    fn host() -> Result<Self> {
        std::env::consts::OS.parse()
    }
}

impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" | "osx" => Ok(Os::Macos),
            "windows" | "win32" => Ok(Os::Windows),
            "freebsd" => Ok(Os::FreeBsd),
            other => Err(Error::InvalidSettings(format!("unknown os: {}", other))),
        }
    }
}

/// Compiler identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl Compiler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Gcc => "gcc",
            Compiler::Clang => "clang",
            Compiler::AppleClang => "apple-clang",
            Compiler::Msvc => "msvc",
        }
    }

    /// The compiler a host OS builds with when none is requested
    pub fn default_for(os: Os) -> Self {
        match os {
            Os::Linux => Compiler::Gcc,
            Os::Macos => Compiler::AppleClang,
            Os::Windows => Compiler::Msvc,
            Os::FreeBsd => Compiler::Clang,
        }
    }
}

impl FromStr for Compiler {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gcc" | "g++" => Ok(Compiler::Gcc),
            "clang" => Ok(Compiler::Clang),
            "apple-clang" | "apple_clang" | "appleclang" => Ok(Compiler::AppleClang),
            "msvc" | "visual studio" | "cl" => Ok(Compiler::Msvc),
            other => Err(Error::InvalidSettings(format!("unknown compiler: {}", other))),
        }
    }
}

/// Build type, spelled the way CMake expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            other => Err(Error::InvalidSettings(format!("unknown build type: {}", other))),
        }
    }
}

/// Target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7",
            Arch::Armv8 => "armv8",
        }
    }

    fn host() -> Result<Self> {
        std::env::consts::ARCH.parse()
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" => Ok(Arch::X86),
            "x86_64" | "amd64" | "x64" => Ok(Arch::X86_64),
            "armv7" | "arm" => Ok(Arch::Armv7),
            "armv8" | "aarch64" | "arm64" => Ok(Arch::Armv8),
            other => Err(Error::InvalidSettings(format!("unknown arch: {}", other))),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Os, Compiler, BuildType, Arch);

/// Immutable per-invocation build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    pub os: Os,
    pub compiler: Compiler,
    pub build_type: BuildType,
    pub arch: Arch,
    /// Build shared libraries instead of static archives
    pub shared: bool,
}

impl BuildSettings {
    pub fn new(os: Os, compiler: Compiler, build_type: BuildType, arch: Arch, shared: bool) -> Self {
        Self {
            os,
            compiler,
            build_type,
            arch,
            shared,
        }
    }

    /// Settings describing the host: native OS, arch and compiler, Release, shared
    pub fn detect() -> Result<Self> {
        let os = Os::host()?;
        Ok(Self {
            os,
            compiler: Compiler::default_for(os),
            build_type: BuildType::default(),
            arch: Arch::host()?,
            shared: true,
        })
    }

    /// Copy of these settings with a different linkage
    pub fn with_shared(&self, shared: bool) -> Self {
        Self {
            shared,
            ..self.clone()
        }
    }
}

impl fmt::Display for BuildSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{} ({})",
            self.os,
            self.arch,
            self.compiler,
            self.build_type,
            if self.shared { "shared" } else { "static" }
        )
    }
}
