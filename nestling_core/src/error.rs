//! Error types for the nestling_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for nestling_core operations
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

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timer session persistence error
    #[error("State error: {0}")]
    State(String),

    /// `start` was called while a contraction is already being timed
    #[error("A contraction is already running; stop it before starting another")]
    ContractionAlreadyRunning,

    /// `stop` was called with no contraction being timed
    #[error("No contraction is running")]
    NoContractionRunning,
}
