use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn merges_object_keys() {
    let current = json!({"a": 1, "b": 2});
    let delta = json!({"b": 3, "c": 4});
    assert_eq!(shallow_merge(current, delta), json!({"a": 1, "b": 3, "c": 4}));
}

#[test]
fn non_object_delta_replaces_current() {
    let current = json!({"a": 1});
    let delta = json!("replacement");
    assert_eq!(shallow_merge(current, delta), json!("replacement"));
}

#[test]
fn non_object_current_is_replaced_by_object_delta() {
    let current = json!(null);
    let delta = json!({"a": 1});
    assert_eq!(shallow_merge(current, delta), json!({"a": 1}));
}
