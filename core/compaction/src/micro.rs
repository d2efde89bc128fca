//! Micro-compaction candidate scan (SPEC_FULL supplement to spec §4.8).
//!
//! A pre-LLM pass over tool-result-shaped entries that flags oversized ones
//! as a token-savings estimate. This never replaces `find_cut_point`/
//! `prepare_compaction`, which remain the single source of truth for what
//! actually gets dropped.

use talon_ids::approx_token_count;
use talon_types::EntryId;
use talon_types::MessageRole;
use talon_types::SessionEntry;

/// One oversized tool-result entry flagged as a compaction candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicroCompactCandidate {
    pub entry_id: EntryId,
    pub estimated_tokens: i64,
}

/// Flag `message`/`tool` entries whose text exceeds `preview_chars`.
pub fn micro_compact_candidates(entries: &[SessionEntry], preview_chars: usize) -> Vec<MicroCompactCandidate> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            SessionEntry::Message { role: MessageRole::Tool, text, id } if text.chars().count() > preview_chars => {
                Some(MicroCompactCandidate { entry_id: id.clone(), estimated_tokens: approx_token_count(text) })
            }
            _ => None,
        })
        .collect()
}

/// Total estimated token savings across every flagged candidate.
pub fn estimated_savings_tokens(candidates: &[MicroCompactCandidate]) -> i64 {
    candidates.iter().map(|c| c.estimated_tokens).sum()
}

#[cfg(test)]
#[path = "micro.test.rs"]
mod tests;
