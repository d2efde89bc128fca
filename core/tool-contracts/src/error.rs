//! Error type for the tool-contract registry.

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum ToolContractError {
    #[snafu(display("tool contract name must be non-empty"))]
    EmptyName {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("tool contract description must be non-empty"))]
    EmptyDescription {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("tool contract parameters must be a JSON object"))]
    ParametersNotObject {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("alias '{alias}' collides with a primary contract name"))]
    AliasCollidesWithName {
        alias: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("tool contract '{name}' already registered"))]
    AlreadyRegistered {
        name: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no tool contract found for '{name_or_alias}'"))]
    NotFound {
        name_or_alias: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ToolContractError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyName { .. }
            | Self::EmptyDescription { .. }
            | Self::ParametersNotObject { .. }
            | Self::AliasCollidesWithName { .. }
            | Self::AlreadyRegistered { .. } => StatusCode::InvalidArguments,
            Self::NotFound { .. } => StatusCode::NotFound,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ToolContractError>;
