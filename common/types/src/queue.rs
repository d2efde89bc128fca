//! Prompt queue types (spec §3 "QueuedPrompt", §4.9.3).

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// Which queue a prompt was submitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptBehavior {
    /// Jumps to the front of the line; drained before follow-ups.
    Steer,
    /// Appended to the tail; drained after steer prompts.
    FollowUp,
}

/// How `dequeueQueuedPrompts` should drain a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DequeueMode {
    OneAtATime,
    All,
}

/// A prompt waiting to be delivered to the agent loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedPrompt {
    pub id: String,
    pub behavior: PromptBehavior,
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub skill_ids: BTreeSet<String>,
    /// Milliseconds since the Unix epoch; refreshed on promotion.
    pub timestamp: i64,
}

impl QueuedPrompt {
    /// `true` when both `text` and `skill_ids` are empty, meaning the
    /// enqueue that would have produced this prompt is a no-op (spec §4.9.3).
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.skill_ids.is_empty()
    }
}

#[cfg(test)]
#[path = "queue.test.rs"]
mod tests;
