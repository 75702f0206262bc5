//! Project Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or building a project
#[derive(Error, Debug)]
pub enum ProjectError {
    /// No project manifest in the directory or any ancestor
    #[error("No quire.toml found in {} or any parent directory", start.display())]
    ManifestNotFound { start: PathBuf },

    /// The manifest exists but cannot be used
    #[error("Invalid project manifest {}: {message}", path.display())]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    /// The project was requested at a point where it cannot exist
    #[error("Invalid project state: {message}")]
    InvalidState { message: String },
}

impl ProjectError {
    /// Create a manifest error
    pub fn manifest_invalid<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::ManifestInvalid { path: path.into(), message: message.into() }
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState { message: message.into() }
    }
}

impl From<std::io::Error> for ProjectError {
    fn from(err: std::io::Error) -> Self {
        Self::Io { message: err.to_string() }
    }
}
