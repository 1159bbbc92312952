//! Error types for cache loading and merging.

use std::path::PathBuf;
use thiserror::Error;

use costat_shp::ShpError;

/// Errors that can occur while loading the base geometry or merging.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The base dataset carries no attribute fields, so no region key can
    /// be derived.
    #[error("base dataset {path} has no attribute fields to key regions by")]
    MissingKeyField { path: PathBuf },

    /// Underlying shapefile error.
    #[error(transparent)]
    Shapefile(#[from] ShpError),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
