//! `shouldCompact` (spec §4.8).

use serde::Deserialize;
use serde::Serialize;
use talon_ids::approx_token_count;
use talon_types::SessionEntry;

/// What drove a compaction decision. `Manual` is never produced by
/// [`should_compact`] itself — it names a caller-initiated compaction for
/// the orchestrator's trace/event plumbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactionTrigger {
    Overflow,
    Threshold,
    Manual,
}

/// Inputs to [`should_compact`].
pub struct ShouldCompactInput<'a> {
    pub overflow: bool,
    pub entries: &'a [SessionEntry],
    pub previous_summary: &'a str,
    pub threshold_tokens: i64,
}

/// Whether compaction is due, and why. `overflow` always beats `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShouldCompactResult {
    pub should_compact: bool,
    pub reason: Option<CompactionTrigger>,
}

pub fn should_compact(input: ShouldCompactInput<'_>) -> ShouldCompactResult {
    if input.overflow {
        return ShouldCompactResult { should_compact: true, reason: Some(CompactionTrigger::Overflow) };
    }

    let joined = input.entries.iter().map(SessionEntry::text).collect::<Vec<_>>().join("\n");
    let tokens_before = approx_token_count(input.previous_summary) + approx_token_count(&joined);

    if tokens_before >= input.threshold_tokens {
        ShouldCompactResult { should_compact: true, reason: Some(CompactionTrigger::Threshold) }
    } else {
        ShouldCompactResult { should_compact: false, reason: None }
    }
}

#[cfg(test)]
#[path = "should_compact.test.rs"]
mod tests;
