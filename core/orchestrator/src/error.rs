//! Error type for the orchestrator's fallible operations (spec §4.9.4,
//! §4.9.5).
//!
//! `executeStep` itself never returns `Err` — every failure it can hit is
//! folded into `ExecuteStepResult::ok = false`. This type only covers
//! `runCompaction`/`handleAgentEnd`/`preSendCompactionCheck`, which the spec
//! says "re-raise" on failure.

use std::any::Any;

use snafu::Snafu;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_error::stack_trace_debug;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub), module)]
pub enum OrchestratorError {
    #[snafu(display("session store failure: {message}"))]
    SessionStore {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("compaction.summary blocked: {reason}"))]
    SummaryBlocked {
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("compaction summary failed: {message}"))]
    SummaryFailed {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("compaction produced an empty summary"))]
    EmptySummary {
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for OrchestratorError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionStore { .. } => StatusCode::Internal,
            Self::SummaryBlocked { .. } => StatusCode::HookBlocked,
            Self::SummaryFailed { .. } | Self::EmptySummary { .. } => StatusCode::ProviderFailure,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
