//! The registries a plugin can reach into. Borrowed mutably for the
//! duration of one `enable`/`disable` call — the kernel facade owns the
//! long-lived registries and is responsible for serialising concurrent
//! plugin operations if it allows more than one in flight.

use talon_capability_policy::CapabilityPolicyRegistry;
use talon_hooks::HookRunner;
use talon_llm_providers::LlmProviderRegistry;
use talon_tool_contracts::ToolContractRegistry;
use talon_tool_providers::ToolProviderRegistry;

pub struct PluginHost<'a> {
    pub hooks: &'a HookRunner,
    pub tool_providers: &'a mut ToolProviderRegistry,
    pub capability_policies: &'a mut CapabilityPolicyRegistry,
    pub tool_contracts: &'a mut ToolContractRegistry,
    pub llm_providers: &'a mut LlmProviderRegistry,
}
