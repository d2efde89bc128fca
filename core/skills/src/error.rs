//! Error type for the skill registry and content resolver.

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum SkillError {
    #[snafu(display("skill location must be non-empty"))]
    EmptyLocation {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("skill id must contain at least one of [a-z0-9._-] after normalisation"))]
    EmptyId {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no skill found for '{id}'"))]
    NotFound {
        id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("skill '{id}' is disabled"))]
    Disabled {
        id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("skill storage failed: {message}"))]
    Storage {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for SkillError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyLocation { .. } | Self::EmptyId { .. } | Self::Disabled { .. } => {
                StatusCode::InvalidArguments
            }
            Self::NotFound { .. } => StatusCode::NotFound,
            Self::Storage { .. } => StatusCode::IoError,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
