//! Event-type taxonomy (spec §6 "Events emitted").

use serde::Deserialize;
use serde::Serialize;

/// Every event the kernel can emit. Kept as one flat enum (rather than a
/// family of event structs) so the hook runner, the event bus, and the
/// trace serialiser can all switch on a single discriminant (DESIGN NOTES:
/// tagged variants as sum types, checked exhaustively at compile time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BrainEventType {
    InputUser,
    InputRegenerate,
    InputSharedTabs,
    LlmSkipped,
    LlmRequest,
    LlmStreamStart,
    LlmStreamDelta,
    LlmStreamEnd,
    LlmResponseRaw,
    LlmResponseParsed,
    LoopStart,
    LoopDone,
    LoopError,
    LoopRestart,
    LoopInternalError,
    LoopSkipStopped,
    LoopEnqueueSkipped,
    StepPlanned,
    StepExecute,
    StepExecuteResult,
    StepFinished,
    AutoRetryStart,
    AutoRetryEnd,
    AutoCompactionStart,
    AutoCompactionEnd,
    SessionCompact,
    SessionTitleManualRefresh,
    SessionTitleAutoUpdated,
    SessionTitleAutoUpdateFailed,
}
