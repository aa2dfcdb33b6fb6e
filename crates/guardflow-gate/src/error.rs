//! Gate error types

use std::time::Duration;
use thiserror::Error;

/// Tagged service error constructed at the collaborator boundary.
///
/// Retry decisions look at [`ApiError::code`] alone; the message is carried for
/// diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: String,
    message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The extracted error code, e.g. `WAFStaleDataException`.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Gate errors
#[derive(Error, Debug)]
pub enum GateError {
    /// The operation failed with a code not allow-listed at this call site.
    /// Surfaced unchanged, no retry was attempted.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The retry budget elapsed while only transient errors were observed.
    /// Wraps the last transient error for diagnostics.
    #[error("deadline of {budget:?} exceeded after {attempts} attempts: {last}")]
    DeadlineExceeded {
        budget: Duration,
        attempts: u32,
        #[source]
        last: ApiError,
    },
}

impl GateError {
    /// True when the retry budget ran out on transient errors only. Callers
    /// that want to retry at a higher level key off this.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, GateError::DeadlineExceeded { .. })
    }

    /// The underlying service error, for either variant.
    pub fn api_error(&self) -> &ApiError {
        match self {
            GateError::Api(err) => err,
            GateError::DeadlineExceeded { last, .. } => last,
        }
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
