//! What a plugin packages: hooks, mode/capability providers, capability
//! policies, tool contracts, and LLM providers (spec §4.7).

use std::sync::Arc;

use talon_hooks::HookHandler;
use talon_host::LlmProviderAdapter;
use talon_host::StepToolProvider;
use talon_types::CapabilityExecutionPolicy;
use talon_types::Mode;
use talon_types::ToolContract;

pub struct HookDeclaration {
    pub hook: String,
    pub handler: Arc<dyn HookHandler>,
    pub priority: Option<i32>,
}

pub struct ModeProviderDeclaration {
    pub mode: Mode,
    pub provider: Arc<dyn StepToolProvider>,
}

pub struct CapabilityProviderDeclaration {
    pub capability: String,
    pub provider: Arc<dyn StepToolProvider>,
}

pub struct CapabilityPolicyDeclaration {
    pub capability: String,
    pub policy: CapabilityExecutionPolicy,
}

/// Everything one plugin wants registered when enabled.
#[derive(Default)]
pub struct PluginDefinition {
    pub hooks: Vec<HookDeclaration>,
    pub mode_providers: Vec<ModeProviderDeclaration>,
    pub capability_providers: Vec<CapabilityProviderDeclaration>,
    pub capability_policies: Vec<CapabilityPolicyDeclaration>,
    pub tool_contracts: Vec<ToolContract>,
    pub llm_providers: Vec<Arc<dyn LlmProviderAdapter>>,
}
