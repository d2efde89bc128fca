//! `prepareCompaction` (spec §4.8).

use talon_ids::approx_token_count;
use talon_types::EntryId;
use talon_types::SessionEntry;

/// A prepared compaction: the new summary, the split of kept vs. dropped
/// entries, and the token accounting either side of the cut.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactionDraft {
    pub summary: String,
    pub first_kept_entry_id: Option<EntryId>,
    pub previous_summary: String,
    pub kept_entries: Vec<SessionEntry>,
    pub dropped_entries: Vec<SessionEntry>,
    pub tokens_before: i64,
    pub tokens_after: i64,
}

fn describe(entry: &SessionEntry) -> String {
    match entry {
        SessionEntry::Message { role, text, .. } => format!("[{role:?}] {text}"),
        SessionEntry::Compaction { reason, summary, .. } => format!("[compaction:{reason}] {summary}"),
        SessionEntry::Label { label, .. } => format!("[label] {label}"),
        SessionEntry::CustomMessage { level, text, .. } => format!("[custom_message:{level:?}] {text}"),
    }
}

fn normalize(text: &str) -> String {
    let mut out = String::new();
    let mut prev_blank = false;
    for line in text.lines() {
        let trimmed = line.trim_end();
        let blank = trimmed.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        out.push_str(trimmed);
        out.push('\n');
        prev_blank = blank;
    }
    out.trim().to_string()
}

/// Keep at most the trailing `max_chars` characters: the oldest part of an
/// already-bounded summary is the least valuable to retain.
fn bound_chars(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        text.to_string()
    } else {
        chars[chars.len() - max_chars..].iter().collect()
    }
}

/// Split `entries` at `cut_index`, fold the dropped prefix into
/// `previous_summary`, and report token deltas. With zero entries the
/// draft is an identity over `previous_summary`.
pub fn prepare_compaction(
    entries: &[SessionEntry],
    previous_summary: &str,
    cut_index: usize,
    max_summary_chars: usize,
) -> CompactionDraft {
    if entries.is_empty() {
        let tokens = approx_token_count(previous_summary);
        return CompactionDraft {
            summary: previous_summary.to_string(),
            first_kept_entry_id: None,
            previous_summary: previous_summary.to_string(),
            kept_entries: Vec::new(),
            dropped_entries: Vec::new(),
            tokens_before: tokens,
            tokens_after: tokens,
        };
    }

    let cut = cut_index.min(entries.len());
    let dropped = entries[..cut].to_vec();
    let kept = entries[cut..].to_vec();
    let first_kept_entry_id = kept.first().map(|e| e.id().to_string());

    let joined_all = entries.iter().map(SessionEntry::text).collect::<Vec<_>>().join("\n");
    let tokens_before = approx_token_count(previous_summary) + approx_token_count(&joined_all);

    let dropped_block = dropped.iter().map(describe).collect::<Vec<_>>().join("\n");
    let combined = normalize(&format!("{previous_summary}\n{dropped_block}"));
    let summary = bound_chars(&combined, max_summary_chars);

    let joined_kept = kept.iter().map(SessionEntry::text).collect::<Vec<_>>().join("\n");
    let tokens_after = approx_token_count(&summary) + approx_token_count(&joined_kept);

    CompactionDraft {
        summary,
        first_kept_entry_id,
        previous_summary: previous_summary.to_string(),
        kept_entries: kept,
        dropped_entries: dropped,
        tokens_before,
        tokens_after,
    }
}

#[cfg(test)]
#[path = "draft.test.rs"]
mod tests;
