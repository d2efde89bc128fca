//! `findCutPoint` (spec §4.8).

use talon_types::EntryId;
use talon_types::SessionEntry;

/// Inputs to [`find_cut_point`].
pub struct FindCutPointInput<'a> {
    pub entries: &'a [SessionEntry],
    pub keep_tail: usize,
    pub split_turn: bool,
}

/// Where to cut the transcript, and the id of the first entry kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutPoint {
    pub cut_index: usize,
    pub first_kept_entry_id: Option<EntryId>,
}

/// Initial cut at `max(0, len - max(1, keep_tail))`; if `split_turn`, walk
/// backward past trailing non-turn-boundary messages so the kept prefix
/// starts at a conversational turn boundary.
pub fn find_cut_point(input: FindCutPointInput<'_>) -> CutPoint {
    let len = input.entries.len();
    let tail = input.keep_tail.max(1);
    let mut cut = len.saturating_sub(tail);

    if input.split_turn {
        while cut > 0 {
            match &input.entries[cut] {
                SessionEntry::Message { .. } if !input.entries[cut].is_turn_boundary() => {
                    cut -= 1;
                }
                _ => break,
            }
        }
    }

    CutPoint {
        cut_index: cut,
        first_kept_entry_id: input.entries.get(cut).map(|e| e.id().to_string()),
    }
}

#[cfg(test)]
#[path = "cut_point.test.rs"]
mod tests;
