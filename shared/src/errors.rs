//! Error types for the Fitness Tracker core

use thiserror::Error;

use crate::validation::FieldError;

/// Core library error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid date in field '{field}': {value}")]
    InvalidDate { field: String, value: String },

    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Malformed exercise data: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl CoreError {
    /// Field errors carried by a validation failure, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            CoreError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::user_message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
