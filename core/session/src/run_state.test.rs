use pretty_assertions::assert_eq;
use talon_types::PromptBehavior;

use super::*;

fn prompt(behavior: PromptBehavior) -> QueuedPrompt {
    QueuedPrompt {
        id: "p1".to_string(),
        behavior,
        text: "hi".to_string(),
        skill_ids: Default::default(),
        timestamp: 0,
    }
}

#[test]
fn pause_is_idempotent() {
    let mut state = RunState::create_session("s1".to_string(), 2, DequeueMode::All);
    state.pause();
    state.pause();
    assert!(state.paused);
}

#[test]
fn stop_clears_both_queues_but_leaves_running() {
    let mut state = RunState::create_session("s1".to_string(), 2, DequeueMode::All);
    state.running = true;
    state.queue.steer.push(prompt(PromptBehavior::Steer));
    state.queue.follow_up.push(prompt(PromptBehavior::FollowUp));

    state.stop();

    assert!(state.stopped);
    assert!(state.running);
    assert!(state.queue.steer.is_empty());
    assert!(state.queue.follow_up.is_empty());
}

#[test]
fn restart_clears_stopped_and_paused_only() {
    let mut state = RunState::create_session("s1".to_string(), 2, DequeueMode::All);
    state.stopped = true;
    state.paused = true;
    state.retry.attempt = 1;

    state.restart();

    assert!(!state.stopped);
    assert!(!state.paused);
    assert_eq!(state.retry.attempt, 1);
}

#[test]
fn set_running_false_forces_compacting_false() {
    let mut state = RunState::create_session("s1".to_string(), 2, DequeueMode::All);
    state.set_running(true);
    state.set_compacting(true);
    assert!(state.compacting);

    state.set_running(false);
    assert!(!state.compacting);
}

#[test]
fn set_compacting_true_is_rejected_while_not_running() {
    let mut state = RunState::create_session("s1".to_string(), 2, DequeueMode::All);
    state.set_compacting(true);
    assert!(!state.compacting);
}
