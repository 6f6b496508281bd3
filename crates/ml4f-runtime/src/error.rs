//! Runtime error types.

use std::error::Error;
use std::fmt;

use ml4f_model::ModelError;

/// Errors from invoking a model artifact.
///
/// There is no recovery or retry anywhere in the runtime: every operation
/// is a single deterministic attempt, and failure is surfaced to the
/// immediate caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvokeError {
    /// The artifact failed header validation.
    InvalidModel {
        /// The specific validation failure.
        reason: ModelError,
    },
    /// The caller's input buffer does not match the input tensor's element
    /// count.
    InputSize {
        /// Element count declared by the input shape.
        expected: usize,
        /// Element count of the buffer actually supplied.
        found: usize,
    },
    /// The caller's output buffer does not match the output tensor's
    /// element count.
    OutputSize {
        /// Element count declared by the output shape.
        expected: usize,
        /// Element count of the buffer actually supplied.
        found: usize,
    },
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidModel { reason } => write!(f, "invalid model: {reason}"),
            Self::InputSize { expected, found } => {
                write!(f, "input buffer holds {found} elements, model expects {expected}")
            }
            Self::OutputSize { expected, found } => {
                write!(f, "output buffer holds {found} elements, model produces {expected}")
            }
        }
    }
}

impl Error for InvokeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidModel { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<ModelError> for InvokeError {
    fn from(reason: ModelError) -> Self {
        Self::InvalidModel { reason }
    }
}
