//! Error types for the configuration and construction surface.
//!
//! Nothing on the real-time path returns these; coefficient computation works on
//! pre-validated, clamped inputs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoeffError {
    #[error("Unknown filter type {0}")]
    UnknownFilterType(i32),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoeffResult<T> = Result<T, CoeffError>;
