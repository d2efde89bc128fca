use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[tokio::test]
async fn handler_fn_wraps_a_closure() {
    let handler = handler_fn(|value| async move {
        let mut value = value;
        value["seen"] = json!(true);
        Ok(HookAction::Patch(value))
    });

    let action = handler
        .call(json!({}))
        .await
        .unwrap_or_else(|e| panic!("handler failed: {e}"));

    match action {
        HookAction::Patch(value) => assert_eq!(value, json!({"seen": true})),
        other => panic!("expected Patch, got {other:?}"),
    }
}

#[test]
fn hook_handler_error_displays_its_message() {
    let err = HookHandlerError::from("boom");
    assert_eq!(err.to_string(), "boom");
}
