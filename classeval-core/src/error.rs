//! Error types for the classeval-core crate.

use thiserror::Error;

/// Top-level error type for evaluation runs.
///
/// Classifier and training failures are surfaced as-is: the harness never
/// retries or recovers, a failing sample aborts the whole run.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Invalid label format: {value}")]
    InvalidLabelFormat { value: String },

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EvalError {
    pub fn invalid_label(value: &serde_json::Value) -> Self {
        Self::InvalidLabelFormat {
            value: value.to_string(),
        }
    }

    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<figment::Error> for EvalError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type EvalResult<T> = Result<T, EvalError>;
