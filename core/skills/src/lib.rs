//! Skill registry and content resolver (spec §4.6).
//!
//! Persistent metadata lives under a single KV key (`skills:meta:v1`),
//! wrapping `{version:1, skills:[…]}`. All mutations go through a
//! [`talon_async_tail::SerialTail`] so concurrent callers observe
//! linearizable order and the persisted snapshot is always consistent —
//! the same "single async tail" primitive the trace serialiser (spec
//! §4.9.6) uses for its per-session writes.

mod error;

pub use error::Result;
pub use error::SkillError;

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use talon_async_tail::SerialTail;
use talon_host::KvStore;
use talon_host::SkillContentReader;
use talon_ids::now_iso;
use talon_types::SkillMetadata;

const META_KEY: &str = "skills:meta:v1";
const DOC_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillDocument {
    version: u32,
    skills: Vec<SkillMetadata>,
}

impl Default for SkillDocument {
    fn default() -> Self {
        Self { version: DOC_VERSION, skills: Vec::new() }
    }
}

/// Fields accepted by [`SkillRegistry::install`]. Installing an id that
/// already exists upserts in place, keeping the original `created_at`.
#[derive(Debug, Clone, Default)]
pub struct InstallSkillInput {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub location: String,
    pub source: String,
    pub enabled: Option<bool>,
    pub disable_model_invocation: Option<bool>,
}

/// Normalise a raw id to `[a-z0-9._-]+`, stripping leading/trailing hyphens.
fn normalize_id(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || matches!(lower, '.' | '_' | '-') {
                lower
            } else {
                '-'
            }
        })
        .collect();
    mapped.trim_matches('-').to_string()
}

/// Registry over persisted [`SkillMetadata`], backed by a host [`KvStore`].
pub struct SkillRegistry {
    kv: Arc<dyn KvStore>,
    tail: SerialTail,
}

impl SkillRegistry {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv, tail: SerialTail::new() }
    }

    async fn load(kv: &Arc<dyn KvStore>) -> Result<SkillDocument> {
        let raw = kv
            .kv_get(META_KEY)
            .await
            .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
        match raw {
            None => Ok(SkillDocument::default()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| error::StorageSnafu { message: e.to_string() }.build()),
        }
    }

    async fn save(kv: &Arc<dyn KvStore>, doc: &SkillDocument) -> Result<()> {
        let value = serde_json::to_value(doc)
            .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
        kv.kv_set(META_KEY, value)
            .await
            .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())
    }

    /// Install (or upsert) a skill's metadata. `location` must be
    /// non-empty; `id` defaults to a normalised form of `name` when absent.
    pub async fn install(&self, input: InstallSkillInput) -> Result<SkillMetadata> {
        if input.location.trim().is_empty() {
            return error::EmptyLocationSnafu.fail();
        }
        let raw_id = input.id.clone().unwrap_or_else(|| input.name.clone());
        let id = normalize_id(&raw_id);
        if id.is_empty() {
            return error::EmptyIdSnafu.fail();
        }

        let kv = self.kv.clone();
        self.tail
            .run(async move {
                let mut doc = Self::load(&kv).await?;
                let now = now_iso();
                match doc.skills.iter_mut().find(|s| s.id == id) {
                    Some(existing) => {
                        existing.name = input.name;
                        existing.description = input.description;
                        existing.location = input.location;
                        existing.source = input.source;
                        if let Some(enabled) = input.enabled {
                            existing.enabled = enabled;
                        }
                        if let Some(disable) = input.disable_model_invocation {
                            existing.disable_model_invocation = disable;
                        }
                        existing.updated_at = now;
                        let saved = existing.clone();
                        Self::save(&kv, &doc).await?;
                        Ok(saved)
                    }
                    None => {
                        let meta = SkillMetadata {
                            id,
                            name: input.name,
                            description: input.description,
                            location: input.location,
                            source: input.source,
                            enabled: input.enabled.unwrap_or(true),
                            disable_model_invocation: input.disable_model_invocation.unwrap_or(false),
                            created_at: now.clone(),
                            updated_at: now,
                        };
                        doc.skills.push(meta.clone());
                        Self::save(&kv, &doc).await?;
                        Ok(meta)
                    }
                }
            })
            .await
    }

    /// Set `enabled = true` and refresh `updated_at`.
    pub async fn enable(&self, id: &str) -> Result<SkillMetadata> {
        self.set_enabled(id, true).await
    }

    /// Set `enabled = false` and refresh `updated_at`.
    pub async fn disable(&self, id: &str) -> Result<SkillMetadata> {
        self.set_enabled(id, false).await
    }

    async fn set_enabled(&self, id: &str, enabled: bool) -> Result<SkillMetadata> {
        let kv = self.kv.clone();
        let id = id.to_string();
        self.tail
            .run(async move {
                let mut doc = Self::load(&kv).await?;
                let entry = doc
                    .skills
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| error::NotFoundSnafu { id: id.clone() }.build())?;
                entry.enabled = enabled;
                entry.updated_at = now_iso();
                let saved = entry.clone();
                Self::save(&kv, &doc).await?;
                Ok(saved)
            })
            .await
    }

    /// Remove a skill's metadata entirely.
    pub async fn uninstall(&self, id: &str) -> Result<()> {
        let kv = self.kv.clone();
        let id = id.to_string();
        self.tail
            .run(async move {
                let mut doc = Self::load(&kv).await?;
                let before = doc.skills.len();
                doc.skills.retain(|s| s.id != id);
                if doc.skills.len() == before {
                    return error::NotFoundSnafu { id }.fail();
                }
                Self::save(&kv, &doc).await
            })
            .await
    }

    /// Look up one skill's metadata by id.
    pub async fn get(&self, id: &str) -> Result<Option<SkillMetadata>> {
        let doc = Self::load(&self.kv).await?;
        Ok(doc.skills.into_iter().find(|s| s.id == id))
    }

    /// All installed skills, sorted by `(name, id)`.
    pub async fn list(&self) -> Result<Vec<SkillMetadata>> {
        let doc = Self::load(&self.kv).await?;
        let mut skills = doc.skills;
        skills.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(skills)
    }

    /// Resolve a skill's content into a prompt block of the form
    /// `<skill id="…" name="…" location="…">…body…</skill>`. Disabled
    /// skills fail unless `allow_disabled` is set.
    pub async fn resolve_content(
        &self,
        reader: &dyn SkillContentReader,
        id: &str,
        allow_disabled: bool,
    ) -> Result<String> {
        let meta = self
            .get(id)
            .await?
            .ok_or_else(|| error::NotFoundSnafu { id: id.to_string() }.build())?;
        if !meta.enabled && !allow_disabled {
            return error::DisabledSnafu { id: meta.id.clone() }.fail();
        }
        let body = reader
            .read_content(&meta.location)
            .await
            .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
        Ok(format!(
            "<skill id=\"{}\" name=\"{}\" location=\"{}\">\n{}\n</skill>",
            meta.id, meta.name, meta.location, body
        ))
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
