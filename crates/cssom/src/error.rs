//! Errors raised by the object model.
//!
//! Only construction-time validation, wrapped evaluation failures and
//! logic errors are reported here. Values that are syntactically accepted
//! but semantically wrong (a `calc()` type mismatch, a malformed `an+b`
//! argument) are recorded as validity flags on the value instead, so one
//! bad declaration never aborts a whole style sheet.

use thiserror::Error;

/// Cause reported by a `calc()` evaluator callback.
pub type EvalError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by constructors, setters and `calc()` evaluation.
#[derive(Debug, Error)]
pub enum CssError {
    /// A required constructor or setter input was missing or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An evaluator failed while reducing a `calc()` expression. The
    /// original failure is kept as the source.
    #[error("could not evaluate calc() expression")]
    CalcEvaluation(#[source] EvalError),

    /// The operation makes no sense for the current state of the value.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl CssError {
    /// Shorthand for [`CssError::InvalidArgument`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
