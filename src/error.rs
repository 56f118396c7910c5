// Error types for jothida.
// Handles backend API errors, configuration errors, and scoring input errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JothidaError {
    #[error("Jothida API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, JothidaError>;

/// Reasons a unified score could not be produced for a profile.
///
/// Backend failures never show up here: each backend slice degrades to
/// `None` on its own. Only bad input stops a score from being computed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("profile has no birth date")]
    MissingBirthDate,

    #[error("invalid {field}: {value:?}")]
    InvalidBirthDetails { field: &'static str, value: String },
}
