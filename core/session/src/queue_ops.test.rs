use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use super::*;

fn state() -> RunState {
    RunState::create_session("s1".to_string(), 2, DequeueMode::All)
}

#[test]
fn enqueue_is_a_no_op_when_text_and_skills_are_empty() {
    let mut s = state();
    let result = enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "   ", BTreeSet::new());
    assert_eq!(result, None);
    assert!(s.queue.steer.is_empty());
}

#[test]
fn enqueue_trims_text_and_routes_by_behavior() {
    let mut s = state();
    enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "  go  ", BTreeSet::new());
    enqueue_queued_prompt(&mut s, PromptBehavior::FollowUp, "later", BTreeSet::new());

    assert_eq!(s.queue.steer.len(), 1);
    assert_eq!(s.queue.steer[0].text, "go");
    assert_eq!(s.queue.follow_up.len(), 1);
}

#[test]
fn enqueue_with_only_skill_ids_is_not_a_no_op() {
    let mut s = state();
    let mut skills = BTreeSet::new();
    skills.insert("commit".to_string());
    let result = enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "", skills);
    assert!(result.is_some());
}

#[test]
fn promote_to_steer_jumps_the_line() {
    let mut s = state();
    enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "already queued", BTreeSet::new());
    let follow_up = enqueue_queued_prompt(&mut s, PromptBehavior::FollowUp, "promote me", BTreeSet::new())
        .unwrap_or_else(|| panic!("enqueue failed"));

    let promoted = promote_queued_prompt(&mut s, &follow_up.id, PromptBehavior::Steer)
        .unwrap_or_else(|| panic!("promote failed"));

    assert_eq!(s.queue.steer.first().map(|p| &p.id), Some(&promoted.id));
    assert!(s.queue.follow_up.is_empty());
}

#[test]
fn demote_to_follow_up_appends_at_the_tail() {
    let mut s = state();
    let steer = enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "demote me", BTreeSet::new())
        .unwrap_or_else(|| panic!("enqueue failed"));
    enqueue_queued_prompt(&mut s, PromptBehavior::FollowUp, "existing", BTreeSet::new());

    promote_queued_prompt(&mut s, &steer.id, PromptBehavior::FollowUp).unwrap_or_else(|| panic!("demote failed"));

    assert_eq!(s.queue.follow_up.last().map(|p| p.text.as_str()), Some("demote me"));
}

#[test]
fn promote_unknown_id_returns_none() {
    let mut s = state();
    assert_eq!(promote_queued_prompt(&mut s, "missing", PromptBehavior::Steer), None);
}

#[test]
fn dequeue_all_drains_the_whole_queue() {
    let mut s = state();
    enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "a", BTreeSet::new());
    enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "b", BTreeSet::new());

    let drained = dequeue_queued_prompts(&mut s, PromptBehavior::Steer, Some(DequeueMode::All));
    assert_eq!(drained.len(), 2);
    assert!(s.queue.steer.is_empty());
}

#[test]
fn dequeue_one_at_a_time_shifts_a_single_prompt() {
    let mut s = state();
    enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "a", BTreeSet::new());
    enqueue_queued_prompt(&mut s, PromptBehavior::Steer, "b", BTreeSet::new());

    let drained = dequeue_queued_prompts(&mut s, PromptBehavior::Steer, Some(DequeueMode::OneAtATime));
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].text, "a");
    assert_eq!(s.queue.steer.len(), 1);
}

#[test]
fn dequeue_falls_back_to_state_default_mode() {
    let mut s = state();
    s.queue.dequeue_mode = DequeueMode::OneAtATime;
    enqueue_queued_prompt(&mut s, PromptBehavior::FollowUp, "a", BTreeSet::new());
    enqueue_queued_prompt(&mut s, PromptBehavior::FollowUp, "b", BTreeSet::new());

    let drained = dequeue_queued_prompts(&mut s, PromptBehavior::FollowUp, None);
    assert_eq!(drained.len(), 1);
}
