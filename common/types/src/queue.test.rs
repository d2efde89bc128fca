use super::*;
use pretty_assertions::assert_eq;

fn prompt(text: &str, skill_ids: BTreeSet<String>) -> QueuedPrompt {
    QueuedPrompt {
        id: "p1".into(),
        behavior: PromptBehavior::Steer,
        text: text.into(),
        skill_ids,
        timestamp: 0,
    }
}

#[test]
fn empty_text_and_skills_is_empty() {
    assert!(prompt("   ", BTreeSet::new()).is_empty());
}

#[test]
fn nonempty_text_is_not_empty() {
    assert!(!prompt("hello", BTreeSet::new()).is_empty());
}

#[test]
fn nonempty_skills_is_not_empty() {
    let mut skills = BTreeSet::new();
    skills.insert("s1".to_string());
    assert!(!prompt("", skills).is_empty());
}
