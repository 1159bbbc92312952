//! Error types for shapefile operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing shapefiles.
#[derive(Debug, Error)]
pub enum ShpError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid file format.
    #[error("invalid shapefile: {message}")]
    InvalidFormat { message: String },

    /// Read past the end of the file.
    #[error("record out of bounds at offset {offset}")]
    RecordOutOfBounds { offset: usize },

    /// Field name is empty or exceeds the 10-byte DBF limit.
    #[error("invalid field name: {name:?}")]
    InvalidFieldName { name: String },

    /// Duplicate field name (case-insensitive).
    #[error("duplicate field name: {name}")]
    DuplicateField { name: String },

    /// Field has zero width.
    #[error("field {name} has zero width")]
    ZeroWidth { name: String },

    /// Unsupported DBF field type byte.
    #[error("unsupported field type {type_byte:?} for field {name}")]
    UnsupportedFieldType { name: String, type_byte: char },

    /// A record's value count does not match the field count.
    #[error("record length mismatch: expected {expected} values, got {actual}")]
    RowLengthMismatch { expected: usize, actual: usize },

    /// Geometry and attribute record counts disagree.
    #[error("record count mismatch: {shapes} shapes but {rows} attribute rows")]
    RecordCountMismatch { shapes: usize, rows: usize },

    /// A numeric value does not fit its field width.
    #[error("value {value} does not fit field {field} (width {width})")]
    NumericOverflow {
        field: String,
        value: f64,
        width: u8,
    },

    /// The spatial-reference sidecar file is missing.
    #[error("missing projection sidecar: {path}")]
    MissingSidecar { path: PathBuf },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shapefile operations.
pub type Result<T> = std::result::Result<T, ShpError>;

impl ShpError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
