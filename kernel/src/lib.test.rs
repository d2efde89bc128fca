use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use talon_config::CompactionConfig;
use talon_config::KernelConfig;
use talon_error::ErrorExt;
use talon_error::Location;
use talon_error::StatusCode;
use talon_host::CreateSessionInput;
use talon_host::HostError;
use talon_host::LlmRequest;
use talon_host::LlmResponse;
use talon_host::Result as HostResult;
use talon_host::SessionHeader;
use talon_host::SummaryRequest;
use talon_plugins::PluginPermissions;
use talon_types::CompactionDraftMeta;
use talon_types::DequeueMode;
use talon_types::EntryId;
use talon_types::MessageRole;
use talon_types::Mode;
use talon_types::SessionContext;
use talon_types::SessionId;
use talon_types::StepTraceRecord;
use tokio_util::sync::CancellationToken;

use super::*;

#[derive(Default)]
struct FakeKv {
    data: StdMutex<BTreeMap<String, Value>>,
}

#[async_trait]
impl KvStore for FakeKv {
    async fn kv_get(&self, key: &str) -> HostResult<Option<Value>> {
        Ok(self.data.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned())
    }

    async fn kv_set(&self, key: &str, value: Value) -> HostResult<()> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), value);
        Ok(())
    }

    async fn kv_remove(&self, key: &str) -> HostResult<()> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> HostResult<Vec<String>> {
        Ok(self
            .data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct FakeSessionStore {
    context: StdMutex<SessionContext>,
}

#[async_trait]
impl SessionStore for FakeSessionStore {
    async fn create_session(&self, _input: CreateSessionInput) -> HostResult<SessionHeader> {
        Ok(SessionHeader { id: "s1".to_string() })
    }

    async fn append_message(&self, _session_id: &SessionId, _role: MessageRole, _text: &str) -> HostResult<EntryId> {
        Ok("e1".to_string())
    }

    async fn append_compaction(
        &self,
        _session_id: &SessionId,
        _reason: &str,
        _summary: &str,
        _meta: CompactionDraftMeta,
    ) -> HostResult<EntryId> {
        Ok("c1".to_string())
    }

    async fn build_session_context(&self, _session_id: &SessionId) -> HostResult<SessionContext> {
        Ok(self.context.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn append_trace_chunk(&self, _trace_id: &str, _chunk_index: usize, _records: Vec<StepTraceRecord>) -> HostResult<()> {
        Ok(())
    }

    async fn read_trace_chunk(&self, _trace_id: &str, _chunk_index: usize) -> HostResult<Vec<StepTraceRecord>> {
        Ok(Vec::new())
    }
}

struct FakeSummarizer;

#[async_trait]
impl CompactionSummarizer for FakeSummarizer {
    async fn summarize(&self, _request: SummaryRequest) -> HostResult<String> {
        Ok("summary".to_string())
    }
}

struct FakeHttp;

#[async_trait]
impl HttpSender for FakeHttp {
    async fn send(&self, _url: &str, _request: &LlmRequest, _cancel: CancellationToken) -> HostResult<LlmResponse> {
        Ok(LlmResponse { status: 200, chunks: vec![json!({"ok": true})] })
    }
}

struct FakeSkillContentReader;

#[async_trait]
impl SkillContentReader for FakeSkillContentReader {
    async fn read_content(&self, location: &str) -> HostResult<String> {
        Ok(format!("content of {location}"))
    }
}

struct StubProvider {
    id: &'static str,
    mode: Option<Mode>,
}

#[async_trait]
impl StepToolProvider for StubProvider {
    fn id(&self) -> &str {
        self.id
    }

    fn mode(&self) -> Option<Mode> {
        self.mode
    }

    async fn invoke(&self, _input: &ExecuteStepInput) -> HostResult<Value> {
        Ok(json!({"provider": self.id}))
    }
}

struct FailingProvider(&'static str);

#[async_trait]
impl StepToolProvider for FailingProvider {
    fn id(&self) -> &str {
        self.0
    }

    async fn invoke(&self, _input: &ExecuteStepInput) -> HostResult<Value> {
        Err(HostError::Backend { message: format!("{} refuses", self.0), location: Location::new(file!(), line!(), column!()) })
    }
}

fn kernel() -> Kernel {
    kernel_with_config(KernelConfig::default())
}

fn kernel_with_config(config: KernelConfig) -> Kernel {
    Kernel::new(KernelDeps {
        session_store: Arc::new(FakeSessionStore::default()),
        summarizer: Arc::new(FakeSummarizer),
        verify_adapter: None,
        kv_store: Arc::new(FakeKv::default()),
        http: Arc::new(FakeHttp),
        config,
    })
}

fn step_input(mode: Mode, action: &str) -> ExecuteStepInput {
    ExecuteStepInput {
        session_id: "s1".to_string(),
        mode: Some(mode),
        capability: None,
        action: action.to_string(),
        args: None,
        verify_policy: None,
    }
}

#[tokio::test]
async fn execute_step_routes_through_registered_mode_provider() {
    let kernel = kernel();
    kernel.register_mode_provider(Mode::Script, Arc::new(StubProvider { id: "script-runner", mode: Some(Mode::Script) })).await;

    let result = kernel.execute_step(step_input(Mode::Script, "read file")).await;

    assert!(result.ok);
    assert_eq!(result.mode_used, Some(Mode::Script));
    assert_eq!(result.data, Some(json!({"provider": "script-runner"})));
}

#[tokio::test]
async fn execute_step_with_no_provider_fails_cleanly() {
    let kernel = kernel();
    let result = kernel.execute_step(step_input(Mode::Bridge, "noop")).await;
    assert!(!result.ok);
    let error = result.error.unwrap_or_else(|| panic!("failure result must carry an error message"));
    assert!(error.contains("no adapter configured for mode"));
}

#[tokio::test]
async fn plugin_enable_registers_capability_provider_and_disable_rolls_back() {
    let kernel = kernel();

    let manifest = PluginManifest {
        id: "fs-plugin".to_string(),
        name: "fs plugin".to_string(),
        version: "1.0.0".to_string(),
        timeout_ms: None,
        permissions: PluginPermissions {
            capabilities: Some(BTreeSet::from(["fs.read".to_string()])),
            ..Default::default()
        },
    };
    let definition = PluginDefinition {
        capability_providers: vec![CapabilityProviderDeclaration {
            capability: "fs.read".to_string(),
            provider: Arc::new(StubProvider { id: "fs-plugin-provider", mode: None }),
        }],
        ..Default::default()
    };

    kernel.enable_plugin(manifest, definition).await.unwrap_or_else(|e| panic!("plugin enable failed: {e}"));
    assert!(kernel.plugin_is_enabled("fs-plugin").await);

    let input = ExecuteStepInput {
        session_id: "s1".to_string(),
        mode: None,
        capability: Some("fs.read".to_string()),
        action: "read config".to_string(),
        args: None,
        verify_policy: None,
    };
    let result = kernel.execute_step(input.clone()).await;
    assert!(result.ok);
    assert_eq!(result.capability_used, Some("fs.read".to_string()));

    kernel.disable_plugin("fs-plugin").await.unwrap_or_else(|e| panic!("plugin disable failed: {e}"));
    assert!(!kernel.plugin_is_enabled("fs-plugin").await);

    let result_after_disable = kernel.execute_step(input).await;
    assert!(!result_after_disable.ok);
}

#[tokio::test]
async fn plugin_enable_rejects_undeclared_capability_permission() {
    let kernel = kernel();
    let manifest = PluginManifest {
        id: "sneaky".to_string(),
        name: "sneaky".to_string(),
        version: "1.0.0".to_string(),
        timeout_ms: None,
        permissions: PluginPermissions::default(),
    };
    let definition = PluginDefinition {
        capability_providers: vec![CapabilityProviderDeclaration {
            capability: "fs.write".to_string(),
            provider: Arc::new(StubProvider { id: "sneaky-provider", mode: None }),
        }],
        ..Default::default()
    };

    let err = kernel.enable_plugin(manifest, definition).await.unwrap_err();
    assert!(!kernel.plugin_is_enabled("sneaky").await);
    assert_eq!(err.status_code(), StatusCode::PluginError);
}

#[tokio::test]
async fn skill_install_enable_disable_and_resolve_content() {
    let kernel = kernel();

    let meta = kernel
        .install_skill(InstallSkillInput {
            id: None,
            name: "Release Notes".to_string(),
            description: "drafts release notes".to_string(),
            location: "skills/release-notes.md".to_string(),
            source: "builtin".to_string(),
            enabled: None,
            disable_model_invocation: None,
        })
        .await
        .unwrap_or_else(|e| panic!("install failed: {e}"));
    assert_eq!(meta.id, "release-notes");
    assert!(meta.enabled);

    let content = kernel
        .resolve_skill_content(&FakeSkillContentReader, &meta.id, false)
        .await
        .unwrap_or_else(|e| panic!("resolve_content failed: {e}"));
    assert!(content.contains("skills/release-notes.md"));

    let disabled = kernel.disable_skill(&meta.id).await.unwrap_or_else(|e| panic!("disable failed: {e}"));
    assert!(!disabled.enabled);

    let err = kernel.resolve_skill_content(&FakeSkillContentReader, &meta.id, false).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::InvalidArguments);

    kernel.enable_skill(&meta.id).await.unwrap_or_else(|e| panic!("re-enable failed: {e}"));
    kernel.uninstall_skill(&meta.id).await.unwrap_or_else(|e| panic!("uninstall failed: {e}"));
    let remaining = kernel.get_skill(&meta.id).await.unwrap_or_else(|e| panic!("get failed: {e}"));
    assert!(remaining.is_none());
}

#[tokio::test]
async fn legacy_archive_then_reset_clears_swept_keys() {
    let kernel = kernel();
    kernel
        .kv_store
        .kv_set("session:meta:s1", json!({"title": "old"}))
        .await
        .unwrap_or_else(|e| panic!("kv_set failed: {e}"));

    let entry = kernel
        .archive_legacy("migration", &["session:meta:s1".to_string()])
        .await
        .unwrap_or_else(|e| panic!("archive failed: {e}"));
    assert_eq!(entry.source, "migration");
    assert_eq!(entry.data.get("session:meta:s1"), Some(&Some(json!({"title": "old"}))));

    kernel.reset_legacy_state().await.unwrap_or_else(|e| panic!("reset failed: {e}"));
    let swept = kernel.kv_store.kv_get("session:meta:s1").await.unwrap_or_else(|e| panic!("kv_get failed: {e}"));
    assert_eq!(swept, None);
}

#[tokio::test]
async fn tool_contract_register_and_resolve_round_trip() {
    let kernel = kernel();
    let contract = ToolContract {
        name: "search".to_string(),
        description: "search the web".to_string(),
        parameters: json!({"type": "object", "properties": {}}),
        aliases: BTreeSet::from(["web_search".to_string()]),
    };

    kernel
        .register_tool_contract(contract.clone(), RegisterOptions::default())
        .await
        .unwrap_or_else(|e| panic!("register failed: {e}"));

    let resolved = kernel.resolve_tool_contract("web_search").await.unwrap_or_else(|e| panic!("resolve failed: {e}"));
    assert_eq!(resolved.name, "search");

    let defs = kernel.list_llm_tool_definitions(ListLlmToolDefinitionsOptions::default()).await;
    assert!(defs.iter().any(|d| d.name == "search"));
    assert!(defs.iter().any(|d| d.name == "web_search"));

    let removed = kernel.unregister_tool_contract("search").await;
    assert!(removed.is_some());
    assert!(kernel.resolve_tool_contract("search").await.is_err());
}

#[tokio::test]
async fn llm_routing_resolves_default_adapter() {
    let kernel = kernel();
    let config = LlmConfigDocument {
        llm_base: Some("https://api.example.com".to_string()),
        llm_key: Some("sk-test".to_string()),
        llm_model: Some("gpt-test".to_string()),
        ..Default::default()
    };

    let resolved = kernel.resolve_llm_route(&config, None, None).unwrap_or_else(|e| panic!("route resolution failed: {e}"));
    assert_eq!(resolved.route.provider_id, "openai_compatible");
    assert_eq!(resolved.route.base_url, "https://api.example.com");

    let adapter = kernel.get_llm_adapter("openai_compatible").await.unwrap_or_else(|e| panic!("adapter lookup failed: {e}"));
    assert_eq!(adapter.id(), "openai_compatible");

    assert!(kernel.get_llm_adapter("does-not-exist").await.is_err());
}

#[tokio::test]
async fn capability_policy_override_is_visible_through_execute_step_fallback() {
    let kernel = kernel();
    kernel.register_mode_provider(Mode::Script, Arc::new(FailingProvider("script-runner"))).await;
    kernel.register_mode_provider(Mode::Cdp, Arc::new(StubProvider { id: "cdp-runner", mode: Some(Mode::Cdp) })).await;

    let result = kernel.execute_step(step_input(Mode::Script, "click button")).await;
    assert!(result.ok);
    assert_eq!(result.mode_used, Some(Mode::Cdp));
    assert_eq!(result.fallback_from, Some(Mode::Script));

    kernel
        .set_capability_policy_override(
            "script",
            "test-override",
            CapabilityExecutionPolicy { fallback_mode: None, default_verify_policy: None, lease_policy: None, allow_script_fallback: Some(false) },
        )
        .await;

    let blocked = kernel.execute_step(step_input(Mode::Script, "click button")).await;
    assert!(!blocked.ok);
    assert_eq!(blocked.mode_used, Some(Mode::Script));
}

#[tokio::test]
async fn handle_agent_end_decides_done_without_retry_or_compaction() {
    let kernel = kernel_with_config(KernelConfig {
        compaction: CompactionConfig { threshold_tokens: 1_000_000, ..Default::default() },
        ..Default::default()
    });
    let mut state = RunState::create_session("s1".to_string(), 3, DequeueMode::OneAtATime);
    state.set_running(true);

    let decision = kernel
        .handle_agent_end(&mut state, AgentEndOutcome::default())
        .await
        .unwrap_or_else(|e| panic!("handle_agent_end failed: {e}"));
    assert_eq!(decision, AgentEndDecision::Done { reason: "completed".to_string() });
}
