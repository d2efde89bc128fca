//! Error type for the legacy-state archiver and reset.

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum LegacyError {
    #[snafu(display("legacy storage failed: {message}"))]
    Storage {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for LegacyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage { .. } => StatusCode::IoError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, LegacyError>;
