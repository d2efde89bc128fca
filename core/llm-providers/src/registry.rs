//! Named map of `LlmProviderAdapter`s (spec §4.5).

use std::collections::HashMap;
use std::sync::Arc;

use talon_host::LlmProviderAdapter;

use crate::error;
use crate::error::Result;
use crate::openai_compatible::OpenAiCompatibleAdapter;

/// Registry of transport adapters, keyed by id. Pre-installs
/// `openai_compatible`.
pub struct LlmProviderRegistry {
    adapters: HashMap<String, Arc<dyn LlmProviderAdapter>>,
}

impl LlmProviderRegistry {
    /// Build a registry with the default `openai_compatible` adapter
    /// wired to `http`, the injected transport collaborator (spec §1: the
    /// LLM transport is out of scope — this registry only knows the
    /// adapter's id and URL convention).
    pub fn with_defaults(http: Arc<dyn crate::openai_compatible::HttpSender>) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(OpenAiCompatibleAdapter::new(http)));
        registry
    }

    pub fn empty() -> Self {
        Self { adapters: HashMap::new() }
    }

    pub fn register(&mut self, adapter: Arc<dyn LlmProviderAdapter>) {
        self.adapters.insert(adapter.id().to_string(), adapter);
    }

    pub fn get(&self, id: &str) -> Result<Arc<dyn LlmProviderAdapter>> {
        self.adapters
            .get(id)
            .cloned()
            .ok_or_else(|| error::AdapterNotFoundSnafu { provider_id: id.to_string() }.build())
    }

    /// Remove an adapter by id. Used by the plugin runtime to reverse a
    /// registration on disable.
    pub fn unregister(&mut self, id: &str) -> Option<Arc<dyn LlmProviderAdapter>> {
        self.adapters.remove(id)
    }
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
