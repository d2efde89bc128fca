use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use talon_hooks::handler_fn;

use super::*;

#[tokio::test]
async fn passes_through_a_continue_action() {
    let inner = handler_fn(|value| async move {
        assert_eq!(value, json!({"a": 1}));
        Ok(HookAction::Continue)
    });
    let state = Arc::new(PluginErrorState::default());
    let wrapper = PluginHookWrapper::new(inner, Duration::from_millis(500), Arc::clone(&state));

    let action = wrapper.call(json!({"a": 1})).await.unwrap_or_else(|e| panic!("{e}"));
    assert!(matches!(action, HookAction::Continue));
    assert_eq!(state.error_count(), 0);
}

#[tokio::test]
async fn swallows_a_handler_error_to_continue_and_records_it() {
    let inner = handler_fn(|_value| async move { Err(HookHandlerError::from("boom")) });
    let state = Arc::new(PluginErrorState::default());
    let wrapper = PluginHookWrapper::new(inner, Duration::from_millis(500), Arc::clone(&state));

    let action = wrapper.call(json!({})).await.unwrap_or_else(|e| panic!("{e}"));
    assert!(matches!(action, HookAction::Continue));
    assert_eq!(state.error_count(), 1);
    assert_eq!(state.last_error(), Some("boom".to_string()));
}

#[tokio::test]
async fn swallows_a_timeout_to_continue_and_records_it() {
    let inner = handler_fn(|_value| async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(HookAction::Continue)
    });
    let state = Arc::new(PluginErrorState::default());
    let wrapper = PluginHookWrapper::new(inner, Duration::from_millis(10), Arc::clone(&state));

    let action = wrapper.call(json!({})).await.unwrap_or_else(|e| panic!("{e}"));
    assert!(matches!(action, HookAction::Continue));
    assert_eq!(state.error_count(), 1);
    assert!(state.last_error().unwrap_or_default().contains("timed out"));
}
