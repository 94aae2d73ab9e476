//! Error types

use thiserror::Error;

/// Main error type for PR Benchmark
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid timestamp in `{field}`: {value:?} (expected YYYY-MM-DDTHH:MM:SSZ)")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Missing field `{field}` on pull request #{number}")]
    MissingField { field: &'static str, number: u64 },

    #[error("Unexpected state {state:?} on pull request #{number}")]
    InvalidState { number: u64, state: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
