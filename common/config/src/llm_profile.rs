//! LLM profile configuration document (spec §4.5).
//!
//! These are raw, undeserialised-further shapes; normalisation (clamping
//! timeouts/retries, defaulting model/role, picking the requested profile)
//! is `core/llm-providers`'s job, not this crate's — this crate only owns
//! the document shape, mirroring the teacher's `ModelsFile`/`ProfilesFile`
//! split between "what the file looks like" and "how it resolves".

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// One named LLM profile as it appears in configuration, before
/// normalisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmProfileConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub llm_base: Option<String>,
    #[serde(default)]
    pub llm_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub llm_timeout_ms: Option<i64>,
    #[serde(default)]
    pub llm_retry_max_attempts: Option<i64>,
    #[serde(default)]
    pub llm_max_retry_delay_ms: Option<i64>,
}

/// `config.llmProfiles` accepts either an array or an object map keyed by
/// profile id (spec §4.5 step 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LlmProfilesField {
    List(Vec<LlmProfileConfig>),
    Map(BTreeMap<String, LlmProfileConfig>),
}

impl LlmProfilesField {
    /// Flatten into a list, filling each profile's `id` from its map key
    /// when the profile itself didn't declare one.
    pub fn into_profiles(self) -> Vec<LlmProfileConfig> {
        match self {
            Self::List(list) => list,
            Self::Map(map) => map
                .into_iter()
                .map(|(key, mut profile)| {
                    if profile.id.is_none() {
                        profile.id = Some(key);
                    }
                    profile
                })
                .collect(),
        }
    }
}

/// `role -> ordered profile ids` (spec §4.5 step 5).
pub type LlmProfileChains = BTreeMap<String, Vec<String>>;

/// Whether the resolver is permitted to walk an escalation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationPolicy {
    UpgradeOnly,
    Disabled,
}

impl EscalationPolicy {
    /// Normalise a raw config value: only the literal `"disabled"` turns
    /// escalation off, everything else (including absence) means
    /// `upgrade_only` (spec §4.5 step 6).
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("disabled") => Self::Disabled,
            _ => Self::UpgradeOnly,
        }
    }
}

/// Top-level LLM configuration document, including the legacy top-level
/// fields used to synthesise a single profile when `llmProfiles` is absent
/// (spec §4.5 step 1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfigDocument {
    #[serde(default)]
    pub llm_profiles: Option<LlmProfilesField>,
    #[serde(default)]
    pub llm_profile_chains: LlmProfileChains,
    #[serde(default)]
    pub llm_base: Option<String>,
    #[serde(default)]
    pub llm_key: Option<String>,
    #[serde(default)]
    pub llm_model: Option<String>,
    #[serde(default)]
    pub llm_timeout_ms: Option<i64>,
    #[serde(default)]
    pub llm_retry_max_attempts: Option<i64>,
    #[serde(default)]
    pub llm_max_retry_delay_ms: Option<i64>,
    #[serde(default)]
    pub escalation_policy: Option<String>,
}

#[cfg(test)]
#[path = "llm_profile.test.rs"]
mod tests;
