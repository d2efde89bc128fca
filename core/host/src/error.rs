//! Error type shared by every host-collaborator trait in this crate.

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

/// Error surfaced by a host-implemented collaborator (session store, KV
/// store, skill content reader, verify adapter, LLM transport).
#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum HostError {
    /// The host's backing resource (file, network call, KV entry) failed.
    #[snafu(display("host operation failed: {message}"))]
    Backend {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// The requested resource does not exist.
    #[snafu(display("not found: {message}"))]
    NotFound {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for HostError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Backend { .. } => StatusCode::IoError,
            Self::NotFound { .. } => StatusCode::NotFound,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
