//! Error types for the analysis engine and the dataset loader.
//!
//! Errors are serializable so a transport layer can hand them to a client
//! as `{ "code": ..., "message": ... }` without further mapping.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis engine.
///
/// Only [`AnalysisError::EmptyDataset`] is produced by the analysis itself;
/// every other stage is fail-soft and degrades into markers inside the report.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The dataset has no columns to analyze.
    #[error("Dataset has no columns to analyze")]
    EmptyDataset,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (e.g., worker thread panicked).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Get error code for client-side handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    /// Check if this error is the empty-dataset failure.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::EmptyDataset)
    }

    /// Whether the caller supplied bad input (maps to a 4xx at the transport layer).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyDataset | Self::InvalidConfig(_))
    }
}

impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Errors raised while turning a file on disk into a dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The extension is not one of the supported formats.
    #[error(
        "Unsupported file format '{0}'. Please upload a CSV, JSON, or Excel file."
    )]
    UnsupportedFormat(String),

    /// The file decoded fine but holds no usable rows or columns.
    #[error("{0}")]
    EmptyData(String),

    /// The file could not be decoded in its declared format.
    #[error("Unable to decode file: {0}")]
    Decode(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl LoadError {
    /// Get error code for client-side handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::EmptyData(_) => "EMPTY_DATA",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }
}

impl Serialize for LoadError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("LoadError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
