//! Public facade crate (spec §2, §9 "one composition root").
//!
//! `Kernel` wires every registry/engine crate in this workspace into the
//! single surface an embedding host actually needs: hook registration via
//! the [`Orchestrator`] it owns, plugin enable/disable, the skill and
//! legacy-state utilities, and tool-contract/LLM-route resolution. Nothing
//! here adds behavior beyond composition — each operation is a thin
//! delegation to the crate that owns it, with errors folded into
//! [`KernelError`] at the boundary.
//!
//! `tool_providers`, `capability_policies`, `tool_contracts`, and
//! `llm_providers` are each behind an `Arc<RwLock<_>>`: `execute_step`
//! reads them on every call, while `enable_plugin`/`disable_plugin` need
//! `&mut` access to the same allocations the orchestrator is already using
//! (spec §4.7) — losing that shared identity would mean rebuilding the
//! orchestrator on every plugin change and forgetting every session's
//! in-flight trace state.

mod error;

use std::sync::Arc;

use talon_capability_policy::CapabilityPolicyRegistry;
use talon_config::KernelConfig;
use talon_config::LlmConfigDocument;
use talon_event_bus::EventBus;
use talon_hooks::HookRunner;
use talon_host::CompactionSummarizer;
use talon_host::KvStore;
use talon_host::SessionStore;
use talon_host::SkillContentReader;
use talon_host::VerifyAdapter;
use talon_llm_providers::HttpSender;
use talon_llm_providers::LlmProviderRegistry;
use talon_llm_providers::ResolveLlmRouteInput;
use talon_llm_providers::ResolvedLlmRoute;
use talon_orchestrator::Orchestrator;
use talon_orchestrator::OrchestratorDeps;
use talon_plugins::PluginDefinition;
use talon_plugins::PluginHost;
use talon_plugins::PluginManager;
use talon_plugins::PluginManifest;
use talon_skills::InstallSkillInput;
use talon_skills::SkillRegistry;
use talon_tool_contracts::ListLlmToolDefinitionsOptions;
use talon_tool_contracts::LlmToolDefinition;
use talon_tool_contracts::RegisterOptions;
use talon_tool_contracts::ToolContractRegistry;
use talon_tool_providers::ToolProviderRegistry;
use talon_types::SkillMetadata;
use talon_types::ToolContract;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

pub use error::KernelError;
pub use error::Result;

// Re-exported so an embedder can build collaborators and registrations
// against this crate alone.
pub use talon_capability_policy::PolicyEntry;
pub use talon_capability_policy::PolicySource;
pub use talon_host::Clock;
pub use talon_host::CreateSessionInput;
pub use talon_host::IdGenerator;
pub use talon_host::LlmProviderAdapter;
pub use talon_host::LlmRequest;
pub use talon_host::LlmResponse;
pub use talon_host::LlmRoute;
pub use talon_host::SessionHeader;
pub use talon_host::StepToolProvider;
pub use talon_host::SummaryRequest;
pub use talon_host::VerifyOutcome;
pub use talon_legacy::ArchiveEntry;
pub use talon_llm_providers::OpenAiCompatibleAdapter;
pub use talon_orchestrator::AgentEndDecision;
pub use talon_orchestrator::AgentEndError;
pub use talon_orchestrator::AgentEndOutcome;
pub use talon_orchestrator::CompactionOutcome;
pub use talon_otel::init_tracing;
pub use talon_plugins::CapabilityPolicyDeclaration;
pub use talon_plugins::CapabilityProviderDeclaration;
pub use talon_plugins::HookDeclaration;
pub use talon_plugins::ModeProviderDeclaration;
pub use talon_session::RunState;
pub use talon_types::CapabilityExecutionPolicy;
pub use talon_types::ExecuteStepInput;
pub use talon_types::ExecuteStepResult;
pub use talon_types::Mode;

/// Host-supplied collaborators a fresh [`Kernel`] needs. Registries
/// (tool providers, capability policies, tool contracts, plugin
/// declarations) are populated after construction, not here — this is
/// only the irreducible set `Kernel::new` cannot default.
pub struct KernelDeps {
    pub session_store: Arc<dyn SessionStore>,
    pub summarizer: Arc<dyn CompactionSummarizer>,
    pub verify_adapter: Option<Arc<dyn VerifyAdapter>>,
    pub kv_store: Arc<dyn KvStore>,
    pub http: Arc<dyn HttpSender>,
    pub config: KernelConfig,
}

/// The composed kernel: one [`Orchestrator`] plus the registries and
/// engines an embedding host drives directly (spec §9 "one composition
/// root" — every other crate in this workspace is reachable from here).
pub struct Kernel {
    hooks: Arc<HookRunner>,
    tool_providers: Arc<RwLock<ToolProviderRegistry>>,
    capability_policies: Arc<RwLock<CapabilityPolicyRegistry>>,
    tool_contracts: Arc<RwLock<ToolContractRegistry>>,
    llm_providers: Arc<RwLock<LlmProviderRegistry>>,
    plugins: Mutex<PluginManager>,
    skills: SkillRegistry,
    kv_store: Arc<dyn KvStore>,
    orchestrator: Orchestrator,
}

impl Kernel {
    /// Wire a fresh kernel: empty tool-provider registry, builtin
    /// capability policies (spec §4.4), an empty tool-contract catalogue,
    /// and an LLM provider registry pre-loaded with `openai_compatible`
    /// (spec §4.5) bound to `deps.http`.
    pub fn new(deps: KernelDeps) -> Self {
        let hooks = Arc::new(HookRunner::new());
        let tool_providers = Arc::new(RwLock::new(ToolProviderRegistry::new()));
        let capability_policies = Arc::new(RwLock::new(CapabilityPolicyRegistry::with_builtins()));
        let tool_contracts = Arc::new(RwLock::new(ToolContractRegistry::new()));
        let llm_providers = Arc::new(RwLock::new(LlmProviderRegistry::with_defaults(deps.http)));
        let skills = SkillRegistry::new(Arc::clone(&deps.kv_store));

        let orchestrator = Orchestrator::new(OrchestratorDeps::with_system_clock(
            Arc::clone(&hooks),
            Arc::clone(&tool_providers),
            Arc::clone(&capability_policies),
            Arc::new(EventBus::new()),
            deps.session_store,
            deps.summarizer,
            deps.verify_adapter,
            deps.config,
        ));

        Self {
            hooks,
            tool_providers,
            capability_policies,
            tool_contracts,
            llm_providers,
            plugins: Mutex::new(PluginManager::new()),
            skills,
            kv_store: deps.kv_store,
            orchestrator,
        }
    }

    /// The step/agent-end/compaction pipeline (spec §4.9).
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// The shared hook registry, for a host that wants to register its own
    /// handlers outside the plugin system.
    pub fn hooks(&self) -> &Arc<HookRunner> {
        &self.hooks
    }

    /// `executeStep` (spec §4.9.1). Never fails outright — every failure
    /// mode folds into `ExecuteStepResult::ok = false`.
    pub async fn execute_step(&self, input: ExecuteStepInput) -> ExecuteStepResult {
        self.orchestrator.execute_step(input).await
    }

    /// `handleAgentEnd` (spec §4.9.4).
    pub async fn handle_agent_end(&self, state: &mut RunState, outcome: AgentEndOutcome) -> Result<AgentEndDecision> {
        self.orchestrator.handle_agent_end(state, outcome).await.map_err(error::orchestrator_err)
    }

    /// `preSendCompactionCheck` (spec §4.9.5; shares `runCompaction` with
    /// `handleAgentEnd` rather than exposing it separately — `CompactionReason`
    /// is an orchestrator-internal type, so compaction is only ever
    /// triggered through these two entry points, never invoked directly).
    pub async fn pre_send_compaction_check(&self, state: &mut RunState) -> Result<bool> {
        self.orchestrator.pre_send_compaction_check(state).await.map_err(error::orchestrator_err)
    }

    /// `getStepStream` (spec §4.9.6).
    pub async fn get_step_stream(&self, session_id: &talon_types::SessionId) -> Vec<talon_types::StepTraceRecord> {
        self.orchestrator.get_step_stream(session_id).await
    }

    /// Register a provider bound to a fixed mode, outside the plugin
    /// system (e.g. a host's builtin script/cdp/bridge driver).
    pub async fn register_mode_provider(&self, mode: Mode, provider: Arc<dyn StepToolProvider>) {
        self.tool_providers.write().await.register_mode(mode, provider);
    }

    /// Register a provider ranked under a capability, outside the plugin
    /// system.
    pub async fn register_capability_provider(&self, capability: &str, provider: Arc<dyn StepToolProvider>) {
        self.tool_providers.write().await.register_capability(capability, provider);
    }

    /// Override a capability's execution policy, outside the plugin
    /// system.
    pub async fn set_capability_policy_override(
        &self,
        capability: &str,
        owner_id: impl Into<String>,
        policy: CapabilityExecutionPolicy,
    ) {
        self.capability_policies.write().await.set_override(capability, owner_id, policy);
    }

    /// Resolve a capability's merged execution policy.
    pub async fn resolve_capability_policy(&self, capability: &str) -> CapabilityExecutionPolicy {
        self.capability_policies.read().await.resolve(capability)
    }

    // ---- Plugins (spec §4.7) ----

    /// Enable a plugin: registers every hook/mode/capability/policy/tool
    /// contract/LLM adapter it declares against the shared registries.
    /// Partial failure rolls back everything that plugin registered.
    pub async fn enable_plugin(&self, manifest: PluginManifest, definition: PluginDefinition) -> Result<()> {
        let mut tool_providers = self.tool_providers.write().await;
        let mut capability_policies = self.capability_policies.write().await;
        let mut tool_contracts = self.tool_contracts.write().await;
        let mut llm_providers = self.llm_providers.write().await;
        let mut host = PluginHost {
            hooks: &self.hooks,
            tool_providers: &mut tool_providers,
            capability_policies: &mut capability_policies,
            tool_contracts: &mut tool_contracts,
            llm_providers: &mut llm_providers,
        };
        self.plugins.lock().await.enable(&mut host, manifest, definition).map_err(error::plugin_err)
    }

    /// Disable a plugin, reversing every registration it made that nobody
    /// else has since replaced.
    pub async fn disable_plugin(&self, plugin_id: &str) -> Result<()> {
        let mut tool_providers = self.tool_providers.write().await;
        let mut capability_policies = self.capability_policies.write().await;
        let mut tool_contracts = self.tool_contracts.write().await;
        let mut llm_providers = self.llm_providers.write().await;
        let mut host = PluginHost {
            hooks: &self.hooks,
            tool_providers: &mut tool_providers,
            capability_policies: &mut capability_policies,
            tool_contracts: &mut tool_contracts,
            llm_providers: &mut llm_providers,
        };
        self.plugins.lock().await.disable(&mut host, plugin_id).map_err(error::plugin_err)
    }

    pub async fn plugin_is_enabled(&self, plugin_id: &str) -> bool {
        self.plugins.lock().await.is_enabled(plugin_id)
    }

    pub async fn plugin_error_count(&self, plugin_id: &str) -> Option<u64> {
        self.plugins.lock().await.error_count(plugin_id)
    }

    pub async fn plugin_last_error(&self, plugin_id: &str) -> Option<String> {
        self.plugins.lock().await.last_error(plugin_id)
    }

    // ---- Skills (spec §4.6) ----

    pub async fn install_skill(&self, input: InstallSkillInput) -> Result<SkillMetadata> {
        self.skills.install(input).await.map_err(error::skill_err)
    }

    pub async fn enable_skill(&self, id: &str) -> Result<SkillMetadata> {
        self.skills.enable(id).await.map_err(error::skill_err)
    }

    pub async fn disable_skill(&self, id: &str) -> Result<SkillMetadata> {
        self.skills.disable(id).await.map_err(error::skill_err)
    }

    pub async fn uninstall_skill(&self, id: &str) -> Result<()> {
        self.skills.uninstall(id).await.map_err(error::skill_err)
    }

    pub async fn get_skill(&self, id: &str) -> Result<Option<SkillMetadata>> {
        self.skills.get(id).await.map_err(error::skill_err)
    }

    pub async fn list_skills(&self) -> Result<Vec<SkillMetadata>> {
        self.skills.list().await.map_err(error::skill_err)
    }

    pub async fn resolve_skill_content(
        &self,
        reader: &dyn SkillContentReader,
        id: &str,
        allow_disabled: bool,
    ) -> Result<String> {
        self.skills.resolve_content(reader, id, allow_disabled).await.map_err(error::skill_err)
    }

    // ---- Legacy state (spec §2 row 13) ----

    pub async fn archive_legacy(&self, source: &str, keys: &[String]) -> Result<ArchiveEntry> {
        talon_legacy::archive_legacy(self.kv_store.as_ref(), source, keys).await.map_err(error::legacy_err)
    }

    pub async fn reset_legacy_state(&self) -> Result<()> {
        talon_legacy::reset_legacy_state(self.kv_store.as_ref()).await.map_err(error::legacy_err)
    }

    // ---- Tool contracts (spec §4.2) ----

    pub async fn register_builtin_tool_contract(&self, contract: ToolContract) -> Result<()> {
        self.tool_contracts.write().await.register_builtin(contract).map_err(error::tool_contract_err)
    }

    pub async fn register_tool_contract(&self, contract: ToolContract, opts: RegisterOptions) -> Result<()> {
        self.tool_contracts.write().await.register(contract, opts).map_err(error::tool_contract_err)
    }

    pub async fn unregister_tool_contract(&self, name: &str) -> Option<ToolContract> {
        self.tool_contracts.write().await.unregister(name)
    }

    pub async fn resolve_tool_contract(&self, name_or_alias: &str) -> Result<ToolContract> {
        self.tool_contracts.read().await.resolve(name_or_alias).map_err(error::tool_contract_err)
    }

    pub async fn list_llm_tool_definitions(&self, opts: ListLlmToolDefinitionsOptions) -> Vec<LlmToolDefinition> {
        self.tool_contracts.read().await.list_llm_tool_definitions(opts)
    }

    // ---- LLM routing (spec §4.5) ----

    /// Resolve a concrete, routable profile plus its escalation chain.
    /// Pure configuration logic — no network access — so it takes no
    /// lock; the adapter itself lives in the registry.
    pub fn resolve_llm_route(&self, config: &LlmConfigDocument, profile: Option<&str>, role: Option<&str>) -> Result<ResolvedLlmRoute> {
        talon_llm_providers::resolve_llm_route(ResolveLlmRouteInput { config, profile, role }).map_err(error::llm_provider_err)
    }

    pub async fn get_llm_adapter(&self, provider_id: &str) -> Result<Arc<dyn LlmProviderAdapter>> {
        self.llm_providers.read().await.get(provider_id).map_err(error::llm_provider_err)
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
