use std::io;
use thiserror::Error;

/// Errors raised anywhere in the chatbots.
///
/// Only `Config` errors at start-up are fatal; everything else is reported
/// to the user and the conversation carries on.
#[derive(Debug, Error)]
pub enum AppError {
    /// Console or filesystem I/O.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed data, such as a transcript file that does not parse.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad environment values, rule tables or response templates.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A transcript could not be written.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Misuse of a session, e.g. closing it twice.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Malformed JSON: {}", err))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Config(format!("Invalid pattern: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Out of range: {}", err))
    }
}
