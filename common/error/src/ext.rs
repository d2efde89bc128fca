//! [`ErrorExt`]: the trait every kernel error enum implements so callers can
//! classify an error without downcasting to a concrete type.

use std::any::Any;
use std::fmt;

use crate::status_code::StatusCode;

/// Extension trait implemented by every error type in the kernel workspace.
pub trait ErrorExt: std::error::Error {
    /// The status code this error maps to.
    fn status_code(&self) -> StatusCode;

    /// Upcast for downstream downcasting (`err.as_any().downcast_ref::<T>()`).
    fn as_any(&self) -> &dyn Any;

    /// Whether the caller should consider retrying the operation that
    /// produced this error.
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// A message safe to surface to an end user or external caller.
    ///
    /// Internal errors are redacted to just their status code; everything
    /// else (validation, config, not-found) is shown verbatim since those
    /// messages are meant to be actionable.
    fn output_msg(&self) -> String {
        if self.status_code() == StatusCode::Internal {
            format!("Internal error: {}", StatusCode::Internal as i32)
        } else {
            self.to_string()
        }
    }
}

/// A minimal ad hoc error for glue code and tests that don't warrant a
/// dedicated `snafu` enum.
#[derive(Debug, Clone)]
pub struct PlainError {
    message: String,
    status_code: StatusCode,
}

impl PlainError {
    /// Build a new plain error with the given message and status.
    pub fn new(message: impl Into<String>, status_code: StatusCode) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PlainError {}

impl ErrorExt for PlainError {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A boxed `std::error::Error` paired with an explicit [`StatusCode`], for
/// wrapping third-party errors (e.g. `std::io::Error`) at a crate boundary.
#[derive(Debug)]
pub struct BoxedError {
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
    status_code: StatusCode,
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for BoxedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl ErrorExt for BoxedError {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Wrap any `std::error::Error` with an explicit status code.
pub fn boxed(
    source: impl std::error::Error + Send + Sync + 'static,
    status_code: StatusCode,
) -> BoxedError {
    BoxedError {
        source: Box::new(source),
        status_code,
    }
}

#[cfg(test)]
#[path = "ext.test.rs"]
mod tests;
