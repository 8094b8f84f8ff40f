//! Error types for Content Flux

use thiserror::Error;

/// Raised when a raw platform record cannot be normalized into a
/// `UniversalMetrics` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

impl ValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field } => field,
        }
    }
}

/// Errors that can occur at the crate boundary
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse platform payload: {0}")]
    ParseError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl ComputeError {
    /// Whether this error only affects a single record and a batch may continue
    pub fn is_record_level(&self) -> bool {
        matches!(self, ComputeError::Validation(_) | ComputeError::ParseError(_))
    }
}
