// src/error.rs
// =============================================================================
// Fatal errors for a validation run.
//
// Only I/O problems live here. Broken links are NOT errors: they are collected
// as violations in the report (see validate/report.rs). If anything in this
// enum happens, the anchor index can't be trusted, so the whole run stops.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a validation run
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("site root `{}` does not exist", .0.display())]
    RootNotFound(PathBuf),

    #[error("site root `{}` is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("failed to walk `{}`", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // A worker task panicked or was cancelled before it finished its file
    #[error("worker task failed: {0}")]
    Task(String),
}

impl SiteError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteError::Read {
            path: path.into(),
            source,
        }
    }
}

impl From<tokio::task::JoinError> for SiteError {
    fn from(err: tokio::task::JoinError) -> Self {
        SiteError::Task(err.to_string())
    }
}
