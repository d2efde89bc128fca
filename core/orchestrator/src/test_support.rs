use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use talon_capability_policy::CapabilityPolicyRegistry;
use talon_config::KernelConfig;
use talon_error::Location;
use talon_event_bus::EventBus;
use talon_hooks::HookRunner;
use talon_host::CompactionSummarizer;
use talon_host::CreateSessionInput;
use talon_host::HostError;
use talon_host::Result as HostResult;
use talon_host::SessionHeader;
use talon_host::StepToolProvider;
use talon_host::SummaryRequest;
use talon_host::VerifyAdapter;
use talon_host::VerifyOutcome;
use talon_tool_providers::ToolProviderRegistry;
use talon_types::CompactionDraftMeta;
use talon_types::EntryId;
use talon_types::ExecuteStepInput;
use talon_types::Mode;
use talon_types::MessageRole;
use talon_types::SessionContext;
use talon_types::SessionEntry;
use talon_types::StepTraceRecord;

use crate::Orchestrator;
use crate::OrchestratorDeps;

#[derive(Default)]
pub struct FakeStore {
    pub context: StdMutex<SessionContext>,
    pub compactions: StdMutex<Vec<(String, String)>>,
}

impl FakeStore {
    pub fn with_entries(entries: Vec<SessionEntry>, previous_summary: impl Into<String>) -> Self {
        Self {
            context: StdMutex::new(SessionContext { entries, previous_summary: previous_summary.into() }),
            compactions: StdMutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl talon_host::SessionStore for FakeStore {
    async fn create_session(&self, _input: CreateSessionInput) -> HostResult<SessionHeader> {
        Ok(SessionHeader { id: "s1".to_string() })
    }

    async fn append_message(&self, _session_id: &String, _role: MessageRole, _text: &str) -> HostResult<EntryId> {
        Ok("e1".to_string())
    }

    async fn append_compaction(
        &self,
        _session_id: &String,
        reason: &str,
        summary: &str,
        _meta: CompactionDraftMeta,
    ) -> HostResult<EntryId> {
        self.compactions.lock().unwrap_or_else(|e| e.into_inner()).push((reason.to_string(), summary.to_string()));
        Ok("compaction-1".to_string())
    }

    async fn build_session_context(&self, _session_id: &String) -> HostResult<SessionContext> {
        Ok(self.context.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn append_trace_chunk(&self, _trace_id: &str, _chunk_index: usize, _records: Vec<StepTraceRecord>) -> HostResult<()> {
        Ok(())
    }

    async fn read_trace_chunk(&self, _trace_id: &str, _chunk_index: usize) -> HostResult<Vec<StepTraceRecord>> {
        Ok(Vec::new())
    }
}

/// Returns whatever was constructed with, or fails when told to.
pub struct FakeSummarizer {
    pub summary: String,
    pub fail: bool,
}

impl FakeSummarizer {
    pub fn returning(summary: impl Into<String>) -> Self {
        Self { summary: summary.into(), fail: false }
    }

    pub fn failing() -> Self {
        Self { summary: String::new(), fail: true }
    }
}

#[async_trait]
impl CompactionSummarizer for FakeSummarizer {
    async fn summarize(&self, _request: SummaryRequest) -> talon_host::Result<String> {
        if self.fail {
            return Err(fake_backend_error("summarizer unavailable"));
        }
        Ok(self.summary.clone())
    }
}

pub struct FakeVerifyAdapter {
    pub verified: bool,
}

#[async_trait]
impl VerifyAdapter for FakeVerifyAdapter {
    async fn verify(&self, _input: &ExecuteStepInput, _data: Option<&Value>) -> VerifyOutcome {
        VerifyOutcome { verified: self.verified, reason: None }
    }
}

/// A `StepToolProvider` bound to a fixed mode that either succeeds with a
/// canned payload or fails every call.
pub struct FakeToolProvider {
    pub id: String,
    pub mode: Mode,
    pub fail: bool,
    pub calls: AtomicI64,
}

impl FakeToolProvider {
    pub fn ok(id: &str, mode: Mode) -> Self {
        Self { id: id.to_string(), mode, fail: false, calls: AtomicI64::new(0) }
    }

    pub fn failing(id: &str, mode: Mode) -> Self {
        Self { id: id.to_string(), mode, fail: true, calls: AtomicI64::new(0) }
    }
}

#[async_trait]
impl StepToolProvider for FakeToolProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn mode(&self) -> Option<Mode> {
        Some(self.mode)
    }

    async fn invoke(&self, _input: &ExecuteStepInput) -> talon_host::Result<Value> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            Err(fake_backend_error(format!("{} failed", self.id)))
        } else {
            Ok(serde_json::json!({"provider": self.id}))
        }
    }
}

/// A fixed wall clock/id source so trace records get deterministic ids.
pub struct FixedClock;

impl talon_host::Clock for FixedClock {
    fn now_iso(&self) -> String {
        "2024-01-01T00:00:00Z".to_string()
    }
}

impl talon_host::IdGenerator for FixedClock {
    fn next_id(&self) -> String {
        "fixed-id".to_string()
    }
}

fn fake_backend_error(message: impl Into<String>) -> HostError {
    HostError::Backend { message: message.into(), location: Location::new(file!(), line!(), column!()) }
}

/// Assembles an [`Orchestrator`] with hermetic fakes and a fixed clock.
/// Register tool providers/policy overrides on `tool_providers` /
/// `capability_policies` before calling [`Builder::build`] — both
/// registries mutate in place and are only wrapped in `Arc` afterwards.
pub struct Builder {
    pub hooks: Arc<HookRunner>,
    pub tool_providers: ToolProviderRegistry,
    pub capability_policies: CapabilityPolicyRegistry,
    store: Arc<FakeStore>,
    summarizer: Arc<dyn CompactionSummarizer>,
    verify_adapter: Option<Arc<dyn VerifyAdapter>>,
    config: KernelConfig,
}

pub fn builder(store: Arc<FakeStore>, summarizer: Arc<dyn CompactionSummarizer>, verify_adapter: Option<Arc<dyn VerifyAdapter>>, config: KernelConfig) -> Builder {
    Builder {
        hooks: Arc::new(HookRunner::new()),
        tool_providers: ToolProviderRegistry::new(),
        capability_policies: CapabilityPolicyRegistry::empty(),
        store,
        summarizer,
        verify_adapter,
        config,
    }
}

impl Builder {
    pub fn build(self) -> (Arc<HookRunner>, Orchestrator) {
        let hooks = self.hooks;
        let orchestrator = Orchestrator::new(OrchestratorDeps {
            hooks: Arc::clone(&hooks),
            tool_providers: Arc::new(tokio::sync::RwLock::new(self.tool_providers)),
            capability_policies: Arc::new(tokio::sync::RwLock::new(self.capability_policies)),
            event_bus: Arc::new(EventBus::new()),
            session_store: self.store,
            summarizer: self.summarizer,
            verify_adapter: self.verify_adapter,
            clock: Arc::new(FixedClock),
            ids: Arc::new(FixedClock),
            config: self.config,
        });
        (hooks, orchestrator)
    }
}
