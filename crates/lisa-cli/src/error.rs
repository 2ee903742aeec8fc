//! Error types for lisa-cli

use std::path::PathBuf;

use lisa_core::LISA_DIR_ENV;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end a `lisa` invocation with a non-zero exit code
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] lisa_core::Error),

    /// A command-line path could not be made absolute
    #[error("Invalid path {}: {source}", path.display())]
    InvalidPath {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No Lisa directory given; pass --source or set {LISA_DIR_ENV}")]
    MissingSource,

    /// The run reported failures; an apply run has already been rolled back
    #[error("{}", failure_message(.restored))]
    RunFailed { restored: bool },
}

fn failure_message(restored: &bool) -> &'static str {
    if *restored {
        "Lisa failed; the project was restored to its previous state"
    } else {
        "Lisa failed"
    }
}

/// Absolute form of a path given on the command line.
pub fn absolute(path: &std::path::Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| CliError::InvalidPath {
        path: path.to_path_buf(),
        source,
    })
}
