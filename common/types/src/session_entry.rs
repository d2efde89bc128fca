//! Session entry types (spec §3 "Session entry").

use serde::Deserialize;
use serde::Serialize;

use crate::EntryId;

/// The role a `message` entry was authored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Tool,
}

/// Severity of a `custom_message` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomMessageLevel {
    Info,
    Warning,
    Error,
}

/// One append-only entry in a session transcript.
///
/// Ordering is append-only; ids are opaque strings unique within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEntry {
    /// A conversational message.
    Message {
        role: MessageRole,
        text: String,
        id: EntryId,
    },
    /// A compaction boundary: summarises everything dropped before it.
    Compaction {
        reason: String,
        summary: String,
        first_kept_entry_id: Option<EntryId>,
        tokens_before: i64,
        tokens_after: i64,
        id: EntryId,
    },
    /// A freeform label entry (e.g. a session title marker).
    Label { label: String, id: EntryId },
    /// A non-conversational system note (telemetry, warnings).
    CustomMessage {
        level: CustomMessageLevel,
        text: String,
        id: EntryId,
    },
}

impl SessionEntry {
    /// The entry's id, regardless of variant.
    pub fn id(&self) -> &str {
        match self {
            Self::Message { id, .. }
            | Self::Compaction { id, .. }
            | Self::Label { id, .. }
            | Self::CustomMessage { id, .. } => id,
        }
    }

    /// Text content used for token accounting and transcript rendering.
    ///
    /// Non-message entries contribute their most informative string field
    /// (the summary, the label, or the note text) so compaction's token
    /// accounting sees every entry kind, not just messages.
    pub fn text(&self) -> &str {
        match self {
            Self::Message { text, .. } => text,
            Self::Compaction { summary, .. } => summary,
            Self::Label { label, .. } => label,
            Self::CustomMessage { text, .. } => text,
        }
    }

    /// `true` if this is a `message` entry with role `user` or `system`.
    ///
    /// Used by `findCutPoint` to honor the "kept prefix starts at a
    /// conversational turn boundary" invariant (spec §4.8).
    pub fn is_turn_boundary(&self) -> bool {
        matches!(
            self,
            Self::Message {
                role: MessageRole::User | MessageRole::System,
                ..
            }
        )
    }
}

/// Produced by the external session manager's `buildSessionContext`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub entries: Vec<SessionEntry>,
    /// Monotonically folded summary of everything pruned in prior
    /// compactions.
    pub previous_summary: String,
}

#[cfg(test)]
#[path = "session_entry.test.rs"]
mod tests;
