//! Error types for drumstaff

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrumstaffError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Step {step} out of range for pattern of length {length}")]
    StepOutOfRange { step: usize, length: usize },
}

pub type Result<T> = std::result::Result<T, DrumstaffError>;
