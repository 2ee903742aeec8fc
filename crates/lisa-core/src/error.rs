//! Error types for lisa-core

use std::path::PathBuf;

/// Result type for lisa-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lisa-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Destination directory does not exist
    #[error("Destination not found: {path}")]
    DestinationNotFound { path: PathBuf },

    /// Destination exists but is not a directory
    #[error("Destination is not a directory: {path}")]
    DestinationNotDirectory { path: PathBuf },

    /// Authoritative template root does not exist
    #[error("Lisa directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// A structured document could not be merged
    #[error("Failed to merge {path}: {reason}")]
    MergeError { path: String, reason: String },

    /// Backup capture or cleanup failed
    #[error("Backup {operation} failed: {reason}")]
    Backup { operation: String, reason: String },

    /// Restoring the pre-run state failed
    #[error("Rollback failed: {reason}")]
    Rollback { reason: String },

    /// Uninstall was requested but no manifest exists
    #[error("No Lisa manifest found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// No strategy registered under this name
    #[error("Unknown strategy: {name}")]
    UnknownStrategy { name: String },

    /// The user declined a confirmation
    #[error("Aborted: {reason}")]
    UserAborted { reason: String },

    /// An interactive prompt failed
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// Git inspection failed
    #[error("Git error: {message}")]
    Git { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from lisa-fs
    #[error(transparent)]
    Fs(#[from] lisa_fs::Error),

    /// Merge error from lisa-merge
    #[error(transparent)]
    Merge(#[from] lisa_merge::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn merge(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::MergeError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::UserAborted {
            reason: reason.into(),
        }
    }
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Self::Git {
            message: err.message().to_string(),
        }
    }
}
