//! Defines the error types for configuration and registry construction.
//!
//! Solving itself never fails; these only surface while setting things up.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatslatorError {
    #[error("Confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("Tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),
    #[error("Equation target name is empty")]
    EmptyTarget,
    #[error("No equations registered for '{0}'")]
    UnknownTarget(String),
    #[error("Malformed solver config: {0}")]
    Config(#[from] serde_json::Error),
}
