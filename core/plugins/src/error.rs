//! Error type for plugin enable/disable (spec §4.7).

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum PluginError {
    #[snafu(display("plugin id must not be empty"))]
    EmptyId {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("plugin '{plugin_id}' is already enabled"))]
    AlreadyEnabled {
        plugin_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("plugin '{plugin_id}' is not enabled"))]
    NotEnabled {
        plugin_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("plugin '{plugin_id}' is not permitted to register hook '{hook}'"))]
    HookNotPermitted {
        plugin_id: String,
        hook: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("plugin '{plugin_id}' is not permitted to register mode '{mode}'"))]
    ModeNotPermitted {
        plugin_id: String,
        mode: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("plugin '{plugin_id}' is not permitted to register capability '{capability}'"))]
    CapabilityNotPermitted {
        plugin_id: String,
        capability: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("tool contract registration failed: {message}"))]
    ToolContractConflict {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for PluginError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyId { .. }
            | Self::AlreadyEnabled { .. }
            | Self::HookNotPermitted { .. }
            | Self::ModeNotPermitted { .. }
            | Self::CapabilityNotPermitted { .. }
            | Self::ToolContractConflict { .. } => StatusCode::InvalidArguments,
            Self::NotEnabled { .. } => StatusCode::NotFound,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, PluginError>;
