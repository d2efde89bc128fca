//! Orchestrator core: `executeStep`, `handleAgentEnd`, `runCompaction`, and
//! the trace serialiser (spec §4.9.1, §4.9.4–§4.9.6), plus
//! `preSendCompactionCheck` (named in §2's data-flow line, sharing
//! `runCompaction` with `handleAgentEnd` rather than duplicating it).
//!
//! This crate is the one place that composes every other registry/engine
//! crate into a single caller-facing surface — the "no cyclic ownership"
//! design note (spec §9): the orchestrator owns the registries; none of
//! them own a reference back.

mod agent_end;
mod compaction;
mod error;
mod execute_step;
#[cfg(test)]
mod test_support;
mod trace;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use talon_capability_policy::CapabilityPolicyRegistry;
use talon_config::KernelConfig;
use talon_event_bus::BrainEvent;
use talon_event_bus::EventBus;
use talon_hooks::HookRunner;
use talon_host::Clock;
use talon_host::CompactionSummarizer;
use talon_host::IdGenerator;
use talon_host::SessionStore;
use talon_host::SystemClock;
use talon_host::VerifyAdapter;
use talon_tool_providers::ToolProviderRegistry;
use talon_types::BrainEventType;
use talon_types::SessionId;
use talon_types::StepTraceRecord;
use tokio::sync::RwLock;

pub use agent_end::AgentEndDecision;
pub use agent_end::AgentEndError;
pub use agent_end::AgentEndOutcome;
pub use agent_end::is_retryable;
pub use compaction::CompactionOutcome;
pub use error::OrchestratorError;
pub use error::Result;
pub use trace::TraceSerializer;
pub use trace::hooks as hook_names;

pub(crate) fn to_value_or_null<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Everything `Orchestrator` needs from its embedding host. Plain fields
/// rather than a trait — this is wiring, not a seam anyone mocks as a
/// whole (each collaborator inside it is the seam).
///
/// `tool_providers`/`capability_policies` are behind an `RwLock` rather than
/// a bare `Arc` — the plugin runtime (spec §4.7) mutates these registries
/// live via `&mut` while a session may be mid-`executeStep`, and the lock
/// lets both sides share the same allocation instead of the orchestrator
/// working from a stale snapshot.
pub struct OrchestratorDeps {
    pub hooks: Arc<HookRunner>,
    pub tool_providers: Arc<RwLock<ToolProviderRegistry>>,
    pub capability_policies: Arc<RwLock<CapabilityPolicyRegistry>>,
    pub event_bus: Arc<EventBus>,
    pub session_store: Arc<dyn SessionStore>,
    pub summarizer: Arc<dyn CompactionSummarizer>,
    pub verify_adapter: Option<Arc<dyn VerifyAdapter>>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub config: KernelConfig,
}

impl OrchestratorDeps {
    /// Wire the real wall clock/RNG (spec §1 "Wall-clock and random-id
    /// sources"); tests build `OrchestratorDeps` directly with fakes
    /// instead.
    #[allow(clippy::too_many_arguments)]
    pub fn with_system_clock(
        hooks: Arc<HookRunner>,
        tool_providers: Arc<RwLock<ToolProviderRegistry>>,
        capability_policies: Arc<RwLock<CapabilityPolicyRegistry>>,
        event_bus: Arc<EventBus>,
        session_store: Arc<dyn SessionStore>,
        summarizer: Arc<dyn CompactionSummarizer>,
        verify_adapter: Option<Arc<dyn VerifyAdapter>>,
        config: KernelConfig,
    ) -> Self {
        let clock: Arc<SystemClock> = Arc::new(SystemClock);
        Self {
            hooks,
            tool_providers,
            capability_policies,
            event_bus,
            session_store,
            summarizer,
            verify_adapter,
            clock: clock.clone(),
            ids: clock,
            config,
        }
    }
}

/// Composes every kernel engine/registry into the caller-facing
/// `executeStep`/`handleAgentEnd`/`runCompaction`/`preSendCompactionCheck`
/// surface.
pub struct Orchestrator {
    hooks: Arc<HookRunner>,
    tool_providers: Arc<RwLock<ToolProviderRegistry>>,
    capability_policies: Arc<RwLock<CapabilityPolicyRegistry>>,
    event_bus: Arc<EventBus>,
    trace: TraceSerializer,
    session_store: Arc<dyn SessionStore>,
    summarizer: Arc<dyn CompactionSummarizer>,
    verify_adapter: Option<Arc<dyn VerifyAdapter>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    config: KernelConfig,
}

impl Orchestrator {
    pub fn new(deps: OrchestratorDeps) -> Self {
        let trace = TraceSerializer::new(Arc::clone(&deps.session_store), deps.config.trace.ring_cap, deps.config.trace.chunk_size);
        Self {
            hooks: deps.hooks,
            tool_providers: deps.tool_providers,
            capability_policies: deps.capability_policies,
            event_bus: deps.event_bus,
            trace,
            session_store: deps.session_store,
            summarizer: deps.summarizer,
            verify_adapter: deps.verify_adapter,
            clock: deps.clock,
            ids: deps.ids,
            config: deps.config,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// `getStepStream` (spec §4.9.6).
    pub async fn get_step_stream(&self, session_id: &SessionId) -> Vec<StepTraceRecord> {
        self.trace.get_step_stream(session_id).await
    }

    /// Publish to the event bus and append to the trace serialiser in one
    /// call — every phase of the pipeline emits through here rather than
    /// touching either collaborator directly (spec §4.9.6).
    pub(crate) async fn emit(&self, session_id: &SessionId, event_type: BrainEventType, payload: Value) {
        self.event_bus.publish(BrainEvent::new(session_id.clone(), event_type, payload.clone()));
        let record = StepTraceRecord {
            id: self.ids.next_id(),
            session_id: session_id.clone(),
            event_type,
            timestamp: self.clock.now_iso(),
            payload,
        };
        self.trace.record(record).await;
    }
}
