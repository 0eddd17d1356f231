//! Errors raised by the feature transform and the scoring pipeline

use thiserror::Error;

/// Failures turning a submitted observation into features
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// Timestamp missing or not a recognizable date
    #[error("Cannot parse {field}: {message}")]
    Parse { field: String, message: String },

    /// Required field missing, non-numeric, or otherwise unusable
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl FeatureError {
    pub fn parse(field: impl Into<String>, message: impl Into<String>) -> Self {
        FeatureError::Parse {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        FeatureError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending input field
    pub fn field(&self) -> &str {
        match self {
            FeatureError::Parse { field, .. } | FeatureError::Validation { field, .. } => field,
        }
    }
}

/// Failures loading or running the regression pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Scoring failed: {0}")]
    Scoring(String),

    #[error("Invalid pipeline artifact: {0}")]
    Artifact(String),
}
