use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use talon_capability_policy::CapabilityPolicyRegistry;
use talon_hooks::HookAction;
use talon_hooks::HookRunner;
use talon_hooks::handler_fn;
use talon_host::LlmRequest;
use talon_host::LlmResponse;
use talon_host::LlmRoute;
use talon_host::Result as HostResult;
use talon_llm_providers::LlmProviderRegistry;
use talon_tool_contracts::ToolContractRegistry;
use talon_tool_providers::ToolProviderRegistry;
use talon_types::CapabilityExecutionPolicy;
use talon_types::ExecuteStepInput;
use talon_types::Mode;
use talon_types::ToolContract;
use tokio_util::sync::CancellationToken;

use super::*;

struct StubProvider(&'static str);

#[async_trait]
impl StepToolProvider for StubProvider {
    fn id(&self) -> &str {
        self.0
    }

    async fn invoke(&self, _input: &ExecuteStepInput) -> HostResult<serde_json::Value> {
        Ok(json!({"from": self.0}))
    }
}

struct StubAdapter(&'static str);

#[async_trait]
impl talon_host::LlmProviderAdapter for StubAdapter {
    fn id(&self) -> &str {
        self.0
    }

    fn resolve_request_url(&self, _route: &LlmRoute) -> String {
        String::new()
    }

    async fn send(&self, _request: LlmRequest, _cancel: CancellationToken) -> HostResult<LlmResponse> {
        Ok(LlmResponse { status: 200, chunks: vec![] })
    }
}

fn contract(name: &str) -> ToolContract {
    ToolContract {
        name: name.to_string(),
        description: format!("{name} description"),
        parameters: json!({"type": "object", "properties": {}}),
        aliases: BTreeSet::new(),
    }
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn manifest(id: &str, permissions: PluginPermissions) -> PluginManifest {
    PluginManifest {
        id: id.to_string(),
        name: id.to_string(),
        version: "1.0.0".to_string(),
        timeout_ms: None,
        permissions,
    }
}

struct Registries {
    hooks: HookRunner,
    tool_providers: ToolProviderRegistry,
    capability_policies: CapabilityPolicyRegistry,
    tool_contracts: ToolContractRegistry,
    llm_providers: LlmProviderRegistry,
}

impl Registries {
    fn new() -> Self {
        Self {
            hooks: HookRunner::new(),
            tool_providers: ToolProviderRegistry::new(),
            capability_policies: CapabilityPolicyRegistry::empty(),
            tool_contracts: ToolContractRegistry::new(),
            llm_providers: LlmProviderRegistry::empty(),
        }
    }

    fn host(&mut self) -> PluginHost<'_> {
        PluginHost {
            hooks: &self.hooks,
            tool_providers: &mut self.tool_providers,
            capability_policies: &mut self.capability_policies,
            tool_contracts: &mut self.tool_contracts,
            llm_providers: &mut self.llm_providers,
        }
    }
}

fn full_definition() -> PluginDefinition {
    PluginDefinition {
        hooks: vec![HookDeclaration {
            hook: "step.before_execute".to_string(),
            handler: handler_fn(|_v| async move { Ok(HookAction::Continue) }),
            priority: None,
        }],
        mode_providers: vec![ModeProviderDeclaration { mode: Mode::Script, provider: Arc::new(StubProvider("script-v1")) }],
        capability_providers: vec![CapabilityProviderDeclaration {
            capability: "browser.action".to_string(),
            provider: Arc::new(StubProvider("browser-v1")),
        }],
        capability_policies: vec![CapabilityPolicyDeclaration {
            capability: "fs.read".to_string(),
            policy: CapabilityExecutionPolicy::default(),
        }],
        tool_contracts: vec![contract("custom_tool")],
        llm_providers: vec![Arc::new(StubAdapter("custom_llm"))],
    }
}

fn full_permissions() -> PluginPermissions {
    PluginPermissions {
        hooks: Some(set(&["step.before_execute"])),
        modes: Some(set(&["script"])),
        capabilities: Some(set(&["browser.action", "fs.read"])),
        replace_providers: false,
    }
}

#[test]
fn enable_registers_everything_the_definition_declares() {
    let mut registries = Registries::new();
    let mut manager = PluginManager::new();

    manager
        .enable(&mut registries.host(), manifest("p1", full_permissions()), full_definition())
        .unwrap_or_else(|e| panic!("enable failed: {e}"));

    assert!(manager.is_enabled("p1"));
    assert!(registries.tool_providers.get_mode(Mode::Script).is_some());
    assert_eq!(registries.tool_providers.capability_provider_ids("browser.action"), vec!["browser-v1".to_string()]);
    assert!(registries.capability_policies.get("fs.read").is_some());
    assert!(registries.tool_contracts.resolve("custom_tool").is_ok());
    assert!(registries.llm_providers.get("custom_llm").is_ok());
}

#[test]
fn disable_reverses_every_registration() {
    let mut registries = Registries::new();
    let mut manager = PluginManager::new();

    manager
        .enable(&mut registries.host(), manifest("p1", full_permissions()), full_definition())
        .unwrap_or_else(|e| panic!("enable failed: {e}"));
    manager.disable(&mut registries.host(), "p1").unwrap_or_else(|e| panic!("disable failed: {e}"));

    assert!(!manager.is_enabled("p1"));
    assert!(registries.tool_providers.get_mode(Mode::Script).is_none());
    assert!(registries.tool_providers.capability_provider_ids("browser.action").is_empty());
    assert!(registries.capability_policies.get("fs.read").is_none());
    assert!(registries.tool_contracts.resolve("custom_tool").is_err());
    assert!(registries.llm_providers.get("custom_llm").is_err());
}

#[test]
fn enabling_an_unpermitted_hook_fails_and_registers_nothing() {
    let mut registries = Registries::new();
    let mut manager = PluginManager::new();

    let err = manager
        .enable(&mut registries.host(), manifest("p1", PluginPermissions::default()), full_definition())
        .unwrap_err();

    assert!(matches!(err, PluginError::HookNotPermitted { .. }));
    assert!(!manager.is_enabled("p1"));
    assert!(registries.tool_providers.get_mode(Mode::Script).is_none());
}

#[test]
fn a_later_permission_failure_rolls_back_earlier_registrations() {
    let mut registries = Registries::new();
    let mut manager = PluginManager::new();

    let permissions = PluginPermissions {
        hooks: Some(set(&["step.before_execute"])),
        modes: Some(set(&["script"])),
        capabilities: None,
        replace_providers: false,
    };

    let err = manager.enable(&mut registries.host(), manifest("p1", permissions), full_definition()).unwrap_err();

    assert!(matches!(err, PluginError::CapabilityNotPermitted { .. }));
    assert!(!manager.is_enabled("p1"));
    assert!(registries.tool_providers.get_mode(Mode::Script).is_none());
}

#[test]
fn replace_providers_snapshots_and_restores_a_mode_provider() {
    let mut registries = Registries::new();
    registries.tool_providers.register_mode(Mode::Script, Arc::new(StubProvider("builtin-script")));

    let mut manager = PluginManager::new();
    let permissions = PluginPermissions {
        hooks: Some(set(&["step.before_execute"])),
        modes: Some(set(&["script"])),
        capabilities: Some(set(&["browser.action", "fs.read"])),
        replace_providers: true,
    };

    manager
        .enable(&mut registries.host(), manifest("p1", permissions), full_definition())
        .unwrap_or_else(|e| panic!("enable failed: {e}"));
    assert_eq!(registries.tool_providers.get_mode(Mode::Script).map(|p| p.id().to_string()), Some("script-v1".to_string()));

    manager.disable(&mut registries.host(), "p1").unwrap_or_else(|e| panic!("disable failed: {e}"));
    assert_eq!(registries.tool_providers.get_mode(Mode::Script).map(|p| p.id().to_string()), Some("builtin-script".to_string()));
}

#[test]
fn disable_does_not_clobber_a_provider_registered_over_it_in_the_interim() {
    let mut registries = Registries::new();
    let mut manager = PluginManager::new();
    let permissions = PluginPermissions {
        hooks: Some(set(&["step.before_execute"])),
        modes: Some(set(&["script"])),
        capabilities: Some(set(&["browser.action", "fs.read"])),
        replace_providers: false,
    };

    manager
        .enable(&mut registries.host(), manifest("p1", permissions), full_definition())
        .unwrap_or_else(|e| panic!("enable failed: {e}"));

    registries.tool_providers.register_mode(Mode::Script, Arc::new(StubProvider("someone-else")));

    manager.disable(&mut registries.host(), "p1").unwrap_or_else(|e| panic!("disable failed: {e}"));
    assert_eq!(registries.tool_providers.get_mode(Mode::Script).map(|p| p.id().to_string()), Some("someone-else".to_string()));
}

#[test]
fn disabling_a_plugin_that_is_not_enabled_is_an_error() {
    let mut registries = Registries::new();
    let mut manager = PluginManager::new();
    let err = manager.disable(&mut registries.host(), "missing").unwrap_err();
    assert!(matches!(err, PluginError::NotEnabled { .. }));
}

#[test]
fn enabling_the_same_plugin_id_twice_is_an_error() {
    let mut registries = Registries::new();
    let mut manager = PluginManager::new();
    manager
        .enable(&mut registries.host(), manifest("p1", full_permissions()), full_definition())
        .unwrap_or_else(|e| panic!("enable failed: {e}"));

    let err = manager
        .enable(&mut registries.host(), manifest("p1", full_permissions()), PluginDefinition::default())
        .unwrap_err();
    assert!(matches!(err, PluginError::AlreadyEnabled { .. }));
}
