//! Resolves a step to a provider by mode or ranked capability list
//! (spec §4.3).
//!
//! Grounded on the same registry idiom as `talon-hooks` (entries behind a
//! lock, sorted deterministically by priority then registration order) —
//! here keyed by mode (single slot) and by capability (ranked list).

mod error;

pub use error::Result;
pub use error::ToolProviderError;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde_json::Value;
use talon_host::StepToolProvider;
use talon_types::ExecuteStepInput;
use talon_types::Mode;

struct RankedEntry {
    seq: u64,
    provider: Arc<dyn StepToolProvider>,
}

/// Result of [`ToolProviderRegistry::invoke`].
pub struct InvokeOutcome {
    pub data: Value,
    pub mode_used: Option<Mode>,
    pub provider_id: String,
    pub capability_used: Option<String>,
}

/// Holds mode→single-provider and capability→ranked-provider-list maps.
pub struct ToolProviderRegistry {
    mode_providers: HashMap<Mode, Arc<dyn StepToolProvider>>,
    capability_providers: HashMap<String, Vec<RankedEntry>>,
    seq: AtomicU64,
}

impl ToolProviderRegistry {
    pub fn new() -> Self {
        Self {
            mode_providers: HashMap::new(),
            capability_providers: HashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    /// Bind `provider` as the single handler for a mode, replacing any
    /// previous one.
    pub fn register_mode(&mut self, mode: Mode, provider: Arc<dyn StepToolProvider>) {
        self.mode_providers.insert(mode, provider);
    }

    /// The provider currently bound to `mode`, if any. Used by the plugin
    /// runtime to snapshot a registration before replacing it.
    pub fn get_mode(&self, mode: Mode) -> Option<Arc<dyn StepToolProvider>> {
        self.mode_providers.get(&mode).cloned()
    }

    /// Clear whatever provider is bound to `mode`.
    pub fn unregister_mode(&mut self, mode: Mode) -> Option<Arc<dyn StepToolProvider>> {
        self.mode_providers.remove(&mode)
    }

    /// Ids of every provider currently ranked under `capability`, in
    /// priority order.
    pub fn capability_provider_ids(&self, capability: &str) -> Vec<String> {
        self.capability_providers
            .get(capability)
            .map(|bucket| bucket.iter().map(|entry| entry.provider.id().to_string()).collect())
            .unwrap_or_default()
    }

    /// Every provider currently ranked under `capability`, in priority
    /// order. Used by the plugin runtime to snapshot a capability's ranked
    /// list before clearing it for a `replaceProviders` registration.
    pub fn capability_providers(&self, capability: &str) -> Vec<Arc<dyn StepToolProvider>> {
        self.capability_providers
            .get(capability)
            .map(|bucket| bucket.iter().map(|entry| Arc::clone(&entry.provider)).collect())
            .unwrap_or_default()
    }

    /// Remove a single provider from `capability`'s ranked list by id.
    pub fn unregister_capability(&mut self, capability: &str, provider_id: &str) -> Option<Arc<dyn StepToolProvider>> {
        let bucket = self.capability_providers.get_mut(capability)?;
        let index = bucket.iter().position(|entry| entry.provider.id() == provider_id)?;
        Some(bucket.remove(index).provider)
    }

    /// Add `provider` to the ranked list for `capability`. Re-sorts by
    /// `priority DESC`, registration order as tie-break.
    pub fn register_capability(&mut self, capability: &str, provider: Arc<dyn StepToolProvider>) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let bucket = self
            .capability_providers
            .entry(capability.to_string())
            .or_default();
        bucket.push(RankedEntry { seq, provider });
        bucket.sort_by(|a, b| {
            b.provider
                .priority()
                .cmp(&a.provider.priority())
                .then(a.seq.cmp(&b.seq))
        });
    }

    /// Resolve the effective mode for `input` without invoking anything.
    pub fn resolve_mode(&self, input: &ExecuteStepInput) -> Option<Mode> {
        if let Some(capability) = &input.capability {
            if let Some(providers) = self.capability_providers.get(capability) {
                if !providers.is_empty() {
                    return input.mode.or_else(|| providers[0].provider.mode());
                }
            }
        }
        if let Some(mode) = input.mode {
            if self.mode_providers.contains_key(&mode) {
                return Some(mode);
            }
        }
        input.mode
    }

    /// Invoke the provider resolved for `input`, preferring a capability
    /// match over a bare mode lookup.
    pub async fn invoke(&self, mode: Option<Mode>, input: &ExecuteStepInput) -> Result<InvokeOutcome> {
        if let Some(capability) = input.capability.clone() {
            return self.invoke_capability(&capability, mode, input).await;
        }
        self.invoke_mode(mode, input).await
    }

    async fn invoke_capability(
        &self,
        capability: &str,
        passed_mode: Option<Mode>,
        input: &ExecuteStepInput,
    ) -> Result<InvokeOutcome> {
        let providers = self
            .capability_providers
            .get(capability)
            .ok_or_else(|| error::CapabilityProviderNotFoundSnafu.build())?;

        for entry in providers {
            let provider_mode = entry.provider.mode().or(passed_mode);
            let mut patched = input.clone();
            patched.mode = provider_mode;
            if entry.provider.can_handle(&patched) {
                let data = entry.provider.invoke(&patched).await.map_err(|source| {
                    error::ProviderFailedSnafu {
                        provider_id: entry.provider.id().to_string(),
                        message: source.to_string(),
                    }
                    .build()
                })?;
                return Ok(InvokeOutcome {
                    data,
                    mode_used: provider_mode,
                    provider_id: entry.provider.id().to_string(),
                    capability_used: Some(capability.to_string()),
                });
            }
        }
        error::CapabilityProviderNotFoundSnafu.fail()
    }

    async fn invoke_mode(&self, mode: Option<Mode>, input: &ExecuteStepInput) -> Result<InvokeOutcome> {
        let mode = mode.ok_or_else(|| error::InvalidModeSnafu.build())?;
        let provider = self
            .mode_providers
            .get(&mode)
            .ok_or_else(|| error::ModeAdapterNotConfiguredSnafu { mode: mode.as_str().to_string() }.build())?;

        let mut patched = input.clone();
        patched.mode = Some(mode);
        let data = provider.invoke(&patched).await.map_err(|source| {
            error::ProviderFailedSnafu {
                provider_id: provider.id().to_string(),
                message: source.to_string(),
            }
            .build()
        })?;
        Ok(InvokeOutcome {
            data,
            mode_used: Some(mode),
            provider_id: provider.id().to_string(),
            capability_used: None,
        })
    }
}

impl Default for ToolProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
