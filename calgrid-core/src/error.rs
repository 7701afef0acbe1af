//! Error types for the calgrid layout engine.

use thiserror::Error;

/// Errors that can occur in calgrid operations.
///
/// Layout itself never fails on unusual event data; only caller bugs and
/// configuration problems surface here.
#[derive(Error, Debug)]
pub enum CalGridError {
    #[error("Invalid granularity '{0}' (expected month, week or day)")]
    InvalidGranularity(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calgrid operations.
pub type CalGridResult<T> = Result<T, CalGridError>;
