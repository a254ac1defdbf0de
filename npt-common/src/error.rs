//! Common error types for nptrends

use thiserror::Error;

/// Common result type for nptrends operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across nptrends jobs and services
#[derive(Error, Debug)]
pub enum Error {
    /// The search backend returned a non-success HTTP status.
    /// There is no retry or backoff: a failing backend terminates the job.
    #[error("Search service unavailable: HTTP {status} from {url}")]
    ServiceUnavailable { status: u16, url: String },

    /// HTTP transport error (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
