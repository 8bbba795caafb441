//! Error types for the core crate
//!
//! Every probe operation and every check evaluation reports failures through
//! [`AssessmentError`]. The engine never lets one of these escape a check: it
//! is converted into a verdict at the check boundary.

use thiserror::Error;

/// Assessment error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessmentError {
    /// Cannot establish, or has lost, the database connection
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Expected schema, table or procedure is absent
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Data is present but differs from the expected values
    #[error("Data mismatch: {0}")]
    DataMismatch(String),

    /// A stored procedure raised an error when invoked
    #[error("Procedure execution error: {0}")]
    ProcedureExecution(String),

    /// A procedure returned fewer result sets than expected
    #[error("Result shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An expected column label is missing from a result set
    #[error("Column alias mismatch: {0}")]
    AliasMismatch(String),

    /// Any other SQL error raised by a metadata or data query
    #[error("Query error: {0}")]
    Query(String),

    /// Invalid configuration or assignment definition
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AssessmentError {
    /// Whether the error means the assessment configuration does not apply to
    /// the submission, rather than the submission being wrong.
    pub fn is_inapplicable(&self) -> bool {
        matches!(
            self,
            AssessmentError::AliasMismatch(_) | AssessmentError::ProcedureExecution(_)
        )
    }
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, AssessmentError>;

/// Convert any displayable error to a Connectivity error
pub fn to_connectivity_error<E: std::fmt::Display>(err: E) -> AssessmentError {
    AssessmentError::Connectivity(err.to_string())
}

/// Convert any displayable error to a Query error
pub fn to_query_error<E: std::fmt::Display>(err: E) -> AssessmentError {
    AssessmentError::Query(err.to_string())
}

/// Convert any displayable error to a ProcedureExecution error
pub fn to_execution_error<E: std::fmt::Display>(err: E) -> AssessmentError {
    AssessmentError::ProcedureExecution(err.to_string())
}

/// Convert any displayable error to a Config error
pub fn to_config_error<E: std::fmt::Display>(err: E) -> AssessmentError {
    AssessmentError::Config(err.to_string())
}

impl From<serde_json::Error> for AssessmentError {
    fn from(err: serde_json::Error) -> Self {
        AssessmentError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssessmentError::SchemaMismatch("table Books is missing".to_string());
        assert_eq!(err.to_string(), "Schema mismatch: table Books is missing");

        let err = AssessmentError::Connectivity("connection refused".to_string());
        assert_eq!(err.to_string(), "Connectivity error: connection refused");
    }

    #[test]
    fn test_inapplicable_classification() {
        assert!(AssessmentError::AliasMismatch("TotalBooks".into()).is_inapplicable());
        assert!(AssessmentError::ProcedureExecution("boom".into()).is_inapplicable());
        assert!(!AssessmentError::ShapeMismatch("one set".into()).is_inapplicable());
        assert!(!AssessmentError::DataMismatch("2 != 3".into()).is_inapplicable());
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AssessmentError = json_err.into();
        match err {
            AssessmentError::Config(_) => {}
            _ => panic!("Expected Config variant"),
        }

        match to_query_error("unknown column") {
            AssessmentError::Query(msg) => assert_eq!(msg, "unknown column"),
            _ => panic!("Expected Query variant"),
        }
    }
}
