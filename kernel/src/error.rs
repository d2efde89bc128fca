//! Error type for the kernel facade.
//!
//! Every sub-crate the facade composes already has its own `ErrorExt`
//! enum; rather than re-exporting six incompatible error types at the
//! public surface, each is folded in here by capturing its message and
//! status code at the call site (the code travels as data, same as
//! `ExecuteStepResult::error_code` does one layer down) rather than
//! keeping the original as a typed `source`.

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum KernelError {
    #[snafu(display("plugin runtime error: {message}"))]
    Plugin {
        message: String,
        code: StatusCode,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("skill registry error: {message}"))]
    Skill {
        message: String,
        code: StatusCode,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("legacy state error: {message}"))]
    Legacy {
        message: String,
        code: StatusCode,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("tool contract error: {message}"))]
    ToolContract {
        message: String,
        code: StatusCode,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("llm provider error: {message}"))]
    LlmProvider {
        message: String,
        code: StatusCode,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("orchestrator error: {message}"))]
    Orchestrator {
        message: String,
        code: StatusCode,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for KernelError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Plugin { code, .. }
            | Self::Skill { code, .. }
            | Self::Legacy { code, .. }
            | Self::ToolContract { code, .. }
            | Self::LlmProvider { code, .. }
            | Self::Orchestrator { code, .. } => *code,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, KernelError>;

pub(crate) fn plugin_err(source: talon_plugins::PluginError) -> KernelError {
    PluginSnafu { message: source.to_string(), code: source.status_code() }.build()
}

pub(crate) fn skill_err(source: talon_skills::SkillError) -> KernelError {
    SkillSnafu { message: source.to_string(), code: source.status_code() }.build()
}

pub(crate) fn legacy_err(source: talon_legacy::LegacyError) -> KernelError {
    LegacySnafu { message: source.to_string(), code: source.status_code() }.build()
}

pub(crate) fn tool_contract_err(source: talon_tool_contracts::ToolContractError) -> KernelError {
    ToolContractSnafu { message: source.to_string(), code: source.status_code() }.build()
}

pub(crate) fn llm_provider_err(source: talon_llm_providers::LlmProviderError) -> KernelError {
    LlmProviderSnafu { message: source.to_string(), code: source.status_code() }.build()
}

pub(crate) fn orchestrator_err(source: talon_orchestrator::OrchestratorError) -> KernelError {
    OrchestratorSnafu { message: source.to_string(), code: source.status_code() }.build()
}
