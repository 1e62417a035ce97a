use thiserror::Error;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned by intake and configuration functions.
///
/// These are the structural failures that abort an import before any row is processed.
/// Per-row problems never surface here; they are collected in a
/// [`crate::pipeline::ValidationReport`].
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV reader/writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON input could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The input does not have the shape an import needs (no header row, missing required
    /// columns, unknown format, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
}

/// Error returned by a [`crate::store::RecordStore`] when an insert is rejected.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another record already holds this unique key.
    #[error("unique constraint violated on '{field}' (value='{value}')")]
    UniqueViolation { field: String, value: String },

    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A validated [`crate::types::NormalizedRecord`] could not be turned into a typed record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing value for '{field}'")]
    Missing { field: String },

    #[error("invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },
}
