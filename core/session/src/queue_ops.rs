//! Prompt queue operations (spec §4.9.3).

use std::collections::BTreeSet;

use talon_ids::now_millis;
use talon_ids::random_id;
use talon_types::DequeueMode;
use talon_types::PromptBehavior;
use talon_types::QueuedPrompt;

use crate::RunState;

/// Trim `text` and dedup `skill_ids`; a no-op (`None`) if both end up
/// empty. Steer enqueues append to `queue.steer`, follow-up enqueues to
/// `queue.follow_up`.
pub fn enqueue_queued_prompt(
    state: &mut RunState,
    behavior: PromptBehavior,
    text: &str,
    skill_ids: BTreeSet<String>,
) -> Option<QueuedPrompt> {
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() && skill_ids.is_empty() {
        return None;
    }

    let prompt = QueuedPrompt {
        id: random_id(16),
        behavior,
        text: trimmed,
        skill_ids,
        timestamp: now_millis(),
    };

    match behavior {
        PromptBehavior::Steer => state.queue.steer.push(prompt.clone()),
        PromptBehavior::FollowUp => state.queue.follow_up.push(prompt.clone()),
    }

    Some(prompt)
}

/// Pull a prompt by id out of `follow_up` first, then `steer`, and
/// reinsert it into `target_behavior`'s queue with a refreshed timestamp.
/// Promoting to steer inserts at the front ("jump the line"); demoting to
/// follow-up appends at the tail.
pub fn promote_queued_prompt(
    state: &mut RunState,
    id: &str,
    target_behavior: PromptBehavior,
) -> Option<QueuedPrompt> {
    let mut prompt = take_by_id(&mut state.queue.follow_up, id)
        .or_else(|| take_by_id(&mut state.queue.steer, id))?;

    prompt.behavior = target_behavior;
    prompt.timestamp = now_millis();

    match target_behavior {
        PromptBehavior::Steer => state.queue.steer.insert(0, prompt.clone()),
        PromptBehavior::FollowUp => state.queue.follow_up.push(prompt.clone()),
    }

    Some(prompt)
}

fn take_by_id(queue: &mut Vec<QueuedPrompt>, id: &str) -> Option<QueuedPrompt> {
    let index = queue.iter().position(|p| p.id == id)?;
    Some(queue.remove(index))
}

/// Drain `behavior`'s queue per `mode` (or the state's default dequeue
/// mode when `mode` is `None`): `all` drains everything, `one-at-a-time`
/// shifts a single prompt. Returns clones so callers may mutate safely.
pub fn dequeue_queued_prompts(
    state: &mut RunState,
    behavior: PromptBehavior,
    mode: Option<DequeueMode>,
) -> Vec<QueuedPrompt> {
    let mode = mode.unwrap_or(state.queue.dequeue_mode);
    let queue = match behavior {
        PromptBehavior::Steer => &mut state.queue.steer,
        PromptBehavior::FollowUp => &mut state.queue.follow_up,
    };

    match mode {
        DequeueMode::All => std::mem::take(queue),
        DequeueMode::OneAtATime => {
            if queue.is_empty() {
                Vec::new()
            } else {
                vec![queue.remove(0)]
            }
        }
    }
}

#[cfg(test)]
#[path = "queue_ops.test.rs"]
mod tests;
