//! The skill content loader collaborator (spec §1, §4.6).

use async_trait::async_trait;

use crate::error::Result;

/// Resolves a skill's `location` to its UTF-8 source text.
#[async_trait]
pub trait SkillContentReader: Send + Sync {
    async fn read_content(&self, location: &str) -> Result<String>;
}
