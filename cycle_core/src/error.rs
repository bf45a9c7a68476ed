//! Error types for the cycle_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cycle_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Date parsing error
    #[error("Date error: {0}")]
    Date(#[from] chrono::ParseError),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store operation error
    #[error("Store error: {0}")]
    Store(String),

    /// Calendar range error
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
