//! Error types for the symbolic layer.

use thiserror::Error;

/// Errors produced by nira-core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NiraError {
    /// An internal invariant of a transformation was violated. Always a bug
    /// in the transformation, never recoverable by the caller.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Model evaluation reached a variable with no assigned value.
    #[error("variable `{0}` has no value in the model")]
    UnboundVariable(String),

    /// Model evaluation reached a quantified term.
    #[error("quantified terms cannot be evaluated against a model")]
    QuantifiedTerm,
}

/// Result type for nira-core operations.
pub type Result<T> = std::result::Result<T, NiraError>;
