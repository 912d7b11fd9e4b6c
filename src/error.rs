//! Error types for the paired-cn library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum CnError {
    #[error("Cannot parse barcode '{label}': {reason}")]
    Parse { label: String, reason: String },

    #[error("Empty result at stage '{stage}': {detail}")]
    EmptyResult { stage: String, detail: String },

    #[error(
        "Integrity failure at stage '{stage}': position {index} pairs tumor '{tumor}' with normal '{normal}'"
    )]
    Integrity {
        stage: String,
        index: usize,
        tumor: String,
        normal: String,
    },

    #[error("Signal kind mismatch: tumor '{tumor}' and normal '{normal}' use different representations")]
    SignalKindMismatch { tumor: String, normal: String },

    #[error("Dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CnError {
    pub(crate) fn empty(stage: &str, detail: impl Into<String>) -> Self {
        CnError::EmptyResult {
            stage: stage.to_string(),
            detail: detail.into(),
        }
    }

    /// True for errors that only invalidate a single label or pair.
    pub fn is_local(&self) -> bool {
        matches!(self, CnError::Parse { .. })
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, CnError>;
