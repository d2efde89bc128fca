use pretty_assertions::assert_eq;

use super::*;

#[test]
fn round_trips_through_json() {
    let meta = SkillMetadata {
        id: "commit".to_string(),
        name: "commit".to_string(),
        description: "Generate a commit message".to_string(),
        location: "skills/commit/SKILL.md".to_string(),
        source: "builtin".to_string(),
        enabled: true,
        disable_model_invocation: false,
        created_at: "2026-01-01T00:00:00.000Z".to_string(),
        updated_at: "2026-01-01T00:00:00.000Z".to_string(),
    };
    let json = serde_json::to_value(&meta).unwrap_or_else(|e| panic!("serialize failed: {e}"));
    let back: SkillMetadata =
        serde_json::from_value(json).unwrap_or_else(|e| panic!("deserialize failed: {e}"));
    assert_eq!(back, meta);
}
