use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Component;

/// Unified error type for project-version operations
///
/// Every core operation returns one of these kinds instead of panicking; the
/// host decides how to present them.
#[derive(Error, Debug)]
pub enum ProjectVersionError {
    #[error("This project has no package.json file.")]
    ManifestNotFound,

    #[error("An error has occurred while updating the project's version. Check if your project's package.json file is valid. ({0})")]
    ManifestUnreadable(String),

    #[error("The package.json file does not contain the version property.")]
    VersionFieldMissing,

    #[error("The file package.json is dirty, either save it, undo the changes or consider using the setting Auto save of the extension.")]
    BufferDirty,

    #[error("Value not within the allowed range. ({component} accepts 1..={max}, got {by})")]
    OutOfRange {
        component: Component,
        by: u64,
        max: u32,
    },

    #[error("Couldn't update the version, either there is no version property or the package.json is not formatted correctly.")]
    RewriteMismatch,

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("The package.json location changed while the operation was in flight")]
    LocationChanged,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in project-version
pub type Result<T> = std::result::Result<T, ProjectVersionError>;

impl ProjectVersionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ProjectVersionError::Config(msg.into())
    }

    /// Create an unreadable-manifest error with context
    pub fn unreadable(msg: impl Into<String>) -> Self {
        ProjectVersionError::ManifestUnreadable(msg.into())
    }

    /// Create a version parsing error for `input`
    pub fn invalid_version(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ProjectVersionError::InvalidVersion {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// True for the informational "no manifest" case, which hosts usually
    /// show as a notice rather than an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProjectVersionError::ManifestNotFound)
    }
}
