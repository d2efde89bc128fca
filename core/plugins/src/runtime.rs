//! Plugin enable/disable (spec §4.7).

use std::collections::HashMap;
use std::sync::Arc;

use talon_hooks::OnOptions;
use talon_hooks::Unregister;
use talon_host::StepToolProvider;
use talon_tool_contracts::RegisterOptions as ToolContractRegisterOptions;
use talon_types::CapabilityExecutionPolicy;
use talon_types::Mode;

use crate::definition::PluginDefinition;
use crate::error;
use crate::error::Result;
use crate::hook_wrapper::PluginErrorState;
use crate::hook_wrapper::PluginHookWrapper;
use crate::host::PluginHost;
use crate::manifest::PluginManifest;

enum Registration {
    Hook(Unregister),
    Mode {
        mode: Mode,
        provider_id: String,
        replaced: Option<Arc<dyn StepToolProvider>>,
    },
    Capability {
        capability: String,
        provider_id: String,
        replaced: Option<Vec<Arc<dyn StepToolProvider>>>,
    },
    Policy {
        capability: String,
        owner_id: String,
        replaced: Option<CapabilityExecutionPolicy>,
    },
    ToolContract {
        name: String,
    },
    LlmProvider {
        id: String,
    },
}

struct PluginRuntimeState {
    error_state: Arc<PluginErrorState>,
    registrations: Vec<Registration>,
}

/// Tracks every enabled plugin's registrations so they can be reversed in
/// LIFO-friendly order on disable.
#[derive(Default)]
pub struct PluginManager {
    plugins: HashMap<String, PluginRuntimeState>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, plugin_id: &str) -> bool {
        self.plugins.contains_key(plugin_id)
    }

    pub fn error_count(&self, plugin_id: &str) -> Option<u64> {
        self.plugins.get(plugin_id).map(|state| state.error_state.error_count())
    }

    pub fn last_error(&self, plugin_id: &str) -> Option<String> {
        self.plugins.get(plugin_id).and_then(|state| state.error_state.last_error())
    }

    /// Enable a plugin: register every declared hook, provider, policy,
    /// tool contract, and LLM provider. Any failure rolls back via
    /// `disable`'s own unwind logic.
    pub fn enable(&mut self, host: &mut PluginHost, manifest: PluginManifest, definition: PluginDefinition) -> Result<()> {
        if manifest.id.trim().is_empty() {
            return error::EmptyIdSnafu.fail();
        }
        if self.plugins.contains_key(&manifest.id) {
            return error::AlreadyEnabledSnafu { plugin_id: manifest.id }.fail();
        }

        let error_state = Arc::new(PluginErrorState::default());
        let mut registrations = Vec::new();

        match enable_registrations(host, &manifest, definition, &error_state, &mut registrations) {
            Ok(()) => {
                self.plugins.insert(manifest.id, PluginRuntimeState { error_state, registrations });
                Ok(())
            }
            Err(err) => {
                rollback(host, registrations);
                Err(err)
            }
        }
    }

    /// Disable a plugin: pop its registrations in LIFO order, reinstating
    /// any replaced provider/policy iff nobody else registered over it in
    /// the interim.
    pub fn disable(&mut self, host: &mut PluginHost, plugin_id: &str) -> Result<()> {
        let state = self
            .plugins
            .remove(plugin_id)
            .ok_or_else(|| error::NotEnabledSnafu { plugin_id: plugin_id.to_string() }.build())?;
        rollback(host, state.registrations);
        Ok(())
    }
}

fn enable_registrations(
    host: &mut PluginHost,
    manifest: &PluginManifest,
    definition: PluginDefinition,
    error_state: &Arc<PluginErrorState>,
    registrations: &mut Vec<Registration>,
) -> Result<()> {
    for decl in definition.hooks {
        if !manifest.permissions.allows_hook(&decl.hook) {
            return error::HookNotPermittedSnafu { plugin_id: manifest.id.clone(), hook: decl.hook }.fail();
        }
        let entry_id = talon_ids::random_id(8);
        let namespaced_id = format!("{}:{}:{}", manifest.id, decl.hook, entry_id);
        let wrapper = Arc::new(PluginHookWrapper::new(decl.handler, manifest.timeout(), Arc::clone(error_state)));
        let unregister = host.hooks.on(&decl.hook, wrapper, OnOptions { id: Some(namespaced_id), priority: decl.priority });
        registrations.push(Registration::Hook(unregister));
    }

    for decl in definition.mode_providers {
        let mode_key = decl.mode.as_str();
        if !manifest.permissions.allows_mode(mode_key) {
            return error::ModeNotPermittedSnafu { plugin_id: manifest.id.clone(), mode: mode_key.to_string() }.fail();
        }
        let previous = host.tool_providers.get_mode(decl.mode);
        let provider_id = decl.provider.id().to_string();
        host.tool_providers.register_mode(decl.mode, decl.provider);
        registrations.push(Registration::Mode {
            mode: decl.mode,
            provider_id,
            replaced: if manifest.permissions.replace_providers { previous } else { None },
        });
    }

    for decl in definition.capability_providers {
        if !manifest.permissions.allows_capability(&decl.capability) {
            return error::CapabilityNotPermittedSnafu {
                plugin_id: manifest.id.clone(),
                capability: decl.capability,
            }
            .fail();
        }
        let replaced = if manifest.permissions.replace_providers {
            let snapshot = host.tool_providers.capability_providers(&decl.capability);
            for id in host.tool_providers.capability_provider_ids(&decl.capability) {
                host.tool_providers.unregister_capability(&decl.capability, &id);
            }
            Some(snapshot)
        } else {
            None
        };
        let provider_id = decl.provider.id().to_string();
        host.tool_providers.register_capability(&decl.capability, decl.provider);
        registrations.push(Registration::Capability {
            capability: decl.capability,
            provider_id,
            replaced,
        });
    }

    for decl in definition.capability_policies {
        if !manifest.permissions.allows_capability(&decl.capability) {
            return error::CapabilityNotPermittedSnafu {
                plugin_id: manifest.id.clone(),
                capability: decl.capability,
            }
            .fail();
        }
        let previous = host.capability_policies.set_override(&decl.capability, manifest.id.clone(), decl.policy);
        registrations.push(Registration::Policy {
            capability: decl.capability,
            owner_id: manifest.id.clone(),
            replaced: previous,
        });
    }

    for contract in definition.tool_contracts {
        let name = contract.name.clone();
        host.tool_contracts
            .register(contract, ToolContractRegisterOptions { replace: manifest.permissions.replace_providers })
            .map_err(|source| error::ToolContractConflictSnafu { message: source.to_string() }.build())?;
        registrations.push(Registration::ToolContract { name });
    }

    for adapter in definition.llm_providers {
        let id = adapter.id().to_string();
        host.llm_providers.register(adapter);
        registrations.push(Registration::LlmProvider { id });
    }

    Ok(())
}

fn rollback(host: &mut PluginHost, mut registrations: Vec<Registration>) {
    while let Some(registration) = registrations.pop() {
        match registration {
            Registration::Hook(unregister) => unregister.call(),
            Registration::Mode { mode, provider_id, replaced } => {
                let still_ours = host.tool_providers.get_mode(mode).map(|p| p.id().to_string()) == Some(provider_id);
                if still_ours {
                    match replaced {
                        Some(previous) => {
                            host.tool_providers.register_mode(mode, previous);
                        }
                        None => {
                            host.tool_providers.unregister_mode(mode);
                        }
                    }
                }
            }
            Registration::Capability { capability, provider_id, replaced } => {
                host.tool_providers.unregister_capability(&capability, &provider_id);
                if let Some(previous) = replaced {
                    if host.tool_providers.capability_provider_ids(&capability).is_empty() {
                        for provider in previous {
                            host.tool_providers.register_capability(&capability, provider);
                        }
                    }
                }
            }
            Registration::Policy { capability, owner_id, replaced } => {
                let still_ours = host
                    .capability_policies
                    .get(&capability)
                    .map(|entry| entry.id == owner_id)
                    .unwrap_or(false);
                if still_ours {
                    match replaced {
                        Some(previous) => {
                            host.capability_policies.set_override(&capability, "restored", previous);
                        }
                        None => {
                            host.capability_policies.clear_override(&capability);
                        }
                    }
                }
            }
            Registration::ToolContract { name } => {
                host.tool_contracts.unregister(&name);
            }
            Registration::LlmProvider { id } => {
                host.llm_providers.unregister(&id);
            }
        }
    }
}

#[cfg(test)]
#[path = "runtime.test.rs"]
mod tests;
