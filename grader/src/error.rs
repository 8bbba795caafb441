//! Error types for the grader

use assessment_core::AssessmentError;
use thiserror::Error;

/// Grader error type
#[derive(Error, Debug)]
pub enum GraderError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A configuration value is invalid
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// Assignment file missing or invalid
    #[error("Assignment error: {0}")]
    Assignment(AssessmentError),

    /// Report could not be written
    #[error("Output error: {0}")]
    Output(String),
}

impl GraderError {
    /// Process exit code for this error. `1` is reserved for failed checks.
    pub fn exit_code(&self) -> u8 {
        match self {
            GraderError::Output(_) => 3,
            _ => 2,
        }
    }
}

/// Result type for the grader
pub type Result<T> = std::result::Result<T, GraderError>;
