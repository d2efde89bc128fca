//! Error type for mode/capability resolution and invocation.

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum ToolProviderError {
    #[snafu(display("no provider registered for capability"))]
    CapabilityProviderNotFound {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no adapter configured for mode '{mode}'"))]
    ModeAdapterNotConfigured {
        mode: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("mode must be one of script/cdp/bridge"))]
    InvalidMode {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("provider '{provider_id}' invocation failed: {message}"))]
    ProviderFailed {
        provider_id: String,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ToolProviderError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CapabilityProviderNotFound { .. } | Self::ModeAdapterNotConfigured { .. } => {
                StatusCode::NotFound
            }
            Self::InvalidMode { .. } => StatusCode::InvalidArguments,
            Self::ProviderFailed { .. } => StatusCode::ProviderFailure,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ToolProviderError>;
