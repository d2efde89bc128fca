//! Errors for profile resolution and adapter dispatch (spec §4.5).

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum LlmProviderError {
    #[snafu(display("profile_not_found"))]
    ProfileNotFound {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("missing_llm_config"))]
    MissingLlmConfig {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("no adapter registered for provider '{provider_id}'"))]
    AdapterNotFound {
        provider_id: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for LlmProviderError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ProfileNotFound { .. } | Self::AdapterNotFound { .. } => StatusCode::NotFound,
            Self::MissingLlmConfig { .. } => StatusCode::InvalidConfig,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, LlmProviderError>;
