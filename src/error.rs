use std::path::PathBuf;

use thiserror::Error;

use crate::domain::FileFailure;

/// Unified error type for verbump operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Version source not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("No version field in {}", .0.display())]
    NoVersionField(PathBuf),

    #[error("Cannot parse version in {}: {reason}", .path.display())]
    UnparsableVersion { path: PathBuf, reason: String },

    #[error("Existing version '{0}' is not a valid semantic version")]
    InvalidExistingVersion(String),

    #[error("Invalid custom version: {0}")]
    InvalidCustomVersion(String),

    #[error("Invalid version: '{0}'")]
    InvalidVersion(String),

    #[error("Cannot increment {version} by {release}")]
    IncrementFailure { version: String, release: String },

    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("Failed to update {} file(s): {}", .failures.len(), format_failures(.failures))]
    AggregateUpdateFailure { failures: Vec<FileFailure> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid version pattern {id}: {source}")]
    Pattern { id: String, source: regex::Error },
}

/// Convenience type alias for Results in verbump
pub type Result<T> = std::result::Result<T, BumpError>;

fn format_failures(failures: &[FileFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.file.display(), f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl BumpError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Create a custom version error with context
    pub fn custom_version(msg: impl Into<String>) -> Self {
        BumpError::InvalidCustomVersion(msg.into())
    }

    pub fn unparsable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BumpError::UnparsableVersion {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BumpError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BumpError::Write {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts the run before any file is touched
    pub fn is_version_resolution(&self) -> bool {
        matches!(
            self,
            BumpError::FileNotFound(_)
                | BumpError::NoVersionField(_)
                | BumpError::UnparsableVersion { .. }
                | BumpError::InvalidExistingVersion(_)
                | BumpError::InvalidCustomVersion(_)
                | BumpError::InvalidVersion(_)
                | BumpError::IncrementFailure { .. }
                | BumpError::UnsupportedFileType(_)
        )
    }
}
