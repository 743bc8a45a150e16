//! Unified error type for the plagiarism-detection pipeline.
//!
//! Most failure modes in this crate are per-file or per-student and are
//! recovered locally, recorded as a [`crate::types::LogEntry`], and never
//! surface here. `GradewatchError`
//! is reserved for the handful of kinds that abort an entire run.

use thiserror::Error;

/// Errors that abort an entire pipeline run.
#[derive(Error, Debug)]
pub enum GradewatchError {
    /// Configuration failed validation before any work started.
    #[error("invalid configuration: {0:?}")]
    Config(Vec<String>),

    /// I/O error while setting up the run (e.g. root directory unreadable).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Run was cancelled between stages.
    #[error("pipeline run cancelled")]
    Cancelled,

    /// Any condition that should never happen during normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = GradewatchError::Config(vec!["num_questions must be at least 1".to_string()]);
        assert!(err.to_string().contains("num_questions"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GradewatchError = io_err.into();
        assert!(matches!(err, GradewatchError::Io(_)));
    }

    #[test]
    fn test_cancelled_display() {
        let err = GradewatchError::Cancelled;
        assert_eq!(err.to_string(), "pipeline run cancelled");
    }

    #[test]
    fn test_internal_error_display() {
        let err = GradewatchError::Internal("unreachable state in clustering".to_string());
        assert!(err.to_string().contains("unreachable state"));
    }
}
