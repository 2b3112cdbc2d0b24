//! Error type definitions

#![allow(missing_docs)]

use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed persisted throttle record
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Transport rejected a batch
    #[error("Transport error: status {status}: {message}")]
    Transport { status: u16, message: String },
}
