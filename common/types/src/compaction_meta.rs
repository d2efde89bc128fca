//! Metadata passed to `appendCompaction` (spec §6).

use serde::Deserialize;
use serde::Serialize;

use crate::EntryId;

/// Token deltas and boundary info that accompany a compaction entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompactionDraftMeta {
    pub first_kept_entry_id: Option<EntryId>,
    pub tokens_before: i64,
    pub tokens_after: i64,
}
