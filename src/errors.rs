use std::result::Result as StdResult;

use thiserror::Error;

/// Failure caused by the submitted data itself.
///
/// These never escape a form as a `Result::Err` of the constructor; they are
/// collected into `FormErrors` so the caller can show them next to the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised by the caller's misuse of the form layer or by config I/O.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Missing scope parameter: {0}")]
    MissingScope(&'static str),
    #[error("Chart of accounts not found: {0}")]
    UnknownChart(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = StdResult<T, FormError>;
