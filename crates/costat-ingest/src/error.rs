//! Error types for report ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering or parsing reports.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Report source directory not found.
    #[error("report directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to enumerate the report directory.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The report is empty or structurally unparsable (missing the required
    /// columns). Recoverable per-file: the batch skips it and continues.
    #[error("report {path} is empty or unparsable")]
    EmptyReport { path: PathBuf },

    /// The report file could not be read.
    #[error("failed to read report {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// True for per-file anomalies the batch absorbs without aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IngestError::EmptyReport { .. } | IngestError::Read { .. }
        )
    }
}
