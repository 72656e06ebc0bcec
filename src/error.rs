// src/error.rs

//! Error types for the stockpot library
//!
//! Every stage failure is fatal at this layer. Diagnostics produced by
//! external tools (git, cmake, compilers) are carried verbatim inside the
//! error message.

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while fetching, building and packaging a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// Source retrieval failed (unreachable remote, clone failure, dirty destination)
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Build descriptor missing or the build system rejected the configuration
    #[error("configuration failed: {0}")]
    Configuration(String),

    /// Compilation exited non-zero
    #[error("build failed: {0}")]
    Build(String),

    /// Package root could not be created or written
    #[error("collection failed: {0}")]
    Collection(String),

    /// Recipe could not be parsed or failed validation
    #[error("parse error: {0}")]
    Parse(String),

    /// A setting value was not recognized
    #[error("invalid setting: {0}")]
    InvalidSettings(String),

    /// A cook stage was invoked out of order
    #[error("invalid stage transition: expected {expected}, cook is {actual}")]
    InvalidStage {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short name of the error kind, used in logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Configuration(_) => "configuration",
            Self::Build(_) => "build",
            Self::Collection(_) => "collection",
            Self::Parse(_) => "parse",
            Self::InvalidSettings(_) => "settings",
            Self::InvalidStage { .. } => "stage",
            Self::Io(_) => "io",
        }
    }
}
