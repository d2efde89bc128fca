use super::*;
use pretty_assertions::assert_eq;

#[test]
fn trace_id_is_prefixed_with_session() {
    assert_eq!(trace_id_for(&"abc".to_string()), "session-abc");
}
