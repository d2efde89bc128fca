//! The compaction summary callback (spec §4.8 `compaction.summary` hook).

use async_trait::async_trait;
use talon_types::SessionEntry;

use crate::error::Result;

/// Request passed to the summary callback: the entries being dropped, plus
/// whatever summary already covers earlier history.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub previous_summary: String,
    pub dropped_entries: Vec<SessionEntry>,
}

/// Produces a new summary covering `dropped_entries` (and folding in
/// `previous_summary`). An empty return is an error (spec §4.8).
#[async_trait]
pub trait CompactionSummarizer: Send + Sync {
    async fn summarize(&self, request: SummaryRequest) -> Result<String>;
}
