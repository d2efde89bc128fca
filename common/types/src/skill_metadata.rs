//! Persistent skill metadata (spec §3 "SkillMetadata", §4.6).

use serde::Deserialize;
use serde::Serialize;

/// One skill's persisted record. `id` is normalised to `[a-z0-9._-]+` with
/// leading/trailing hyphens stripped (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    /// Free-form provenance tag (e.g. `"builtin"`, `"user"`, a plugin id).
    pub source: String,
    pub enabled: bool,
    pub disable_model_invocation: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
#[path = "skill_metadata.test.rs"]
mod tests;
