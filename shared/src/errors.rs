//! Error types shared between the formula engine and its consumers

use thiserror::Error;

/// Errors produced by the pure formula functions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// A precondition on the formula inputs was violated.
    /// The message names the violated constraint and is safe to show callers.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
