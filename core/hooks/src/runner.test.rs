use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::action::handler_fn;

#[tokio::test]
async fn runs_handlers_in_priority_then_registration_order() {
    let runner = HookRunner::new();
    let order = Arc::new(std::sync::Mutex::new(Vec::<&'static str>::new()));

    let order_a = Arc::clone(&order);
    runner.on(
        "pre",
        handler_fn(move |value| {
            let order_a = Arc::clone(&order_a);
            async move {
                order_a.lock().unwrap_or_else(|e| e.into_inner()).push("low");
                Ok(HookAction::Continue)
            }
        }),
        OnOptions { priority: Some(0), ..Default::default() },
    );

    let order_b = Arc::clone(&order);
    runner.on(
        "pre",
        handler_fn(move |_value| {
            let order_b = Arc::clone(&order_b);
            async move {
                order_b.lock().unwrap_or_else(|e| e.into_inner()).push("high");
                Ok(HookAction::Continue)
            }
        }),
        OnOptions { priority: Some(10), ..Default::default() },
    );

    runner.run("pre", json!(null)).await;

    assert_eq!(*order.lock().unwrap_or_else(|e| e.into_inner()), vec!["high", "low"]);
}

#[tokio::test]
async fn patches_are_merged_in_sequence() {
    let runner = HookRunner::new();
    runner.on(
        "pre",
        handler_fn(|_value| async move { Ok(HookAction::Patch(json!({"a": 1}))) }),
        OnOptions::default(),
    );
    runner.on(
        "pre",
        handler_fn(|_value| async move { Ok(HookAction::Patch(json!({"b": 2}))) }),
        OnOptions::default(),
    );

    let result = runner.run("pre", json!({})).await;

    assert_eq!(result.value, json!({"a": 1, "b": 2}));
    assert_eq!(result.patch_count, 2);
    assert!(!result.blocked);
}

#[tokio::test]
async fn block_short_circuits_later_handlers() {
    let runner = HookRunner::new();
    let calls = Arc::new(AtomicUsize::new(0));

    runner.on(
        "pre",
        handler_fn(|_value| async move { Ok(HookAction::Block("nope".to_string())) }),
        OnOptions { priority: Some(10), ..Default::default() },
    );

    let calls_clone = Arc::clone(&calls);
    runner.on(
        "pre",
        handler_fn(move |_value| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            async move { Ok(HookAction::Continue) }
        }),
        OnOptions { priority: Some(0), ..Default::default() },
    );

    let result = runner.run("pre", json!(null)).await;

    assert!(result.blocked);
    assert_eq!(result.reason.as_deref(), Some("nope"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn handler_errors_are_captured_and_do_not_abort_the_chain() {
    let runner = HookRunner::new();
    runner.on(
        "pre",
        handler_fn(|_value| async move { Err("boom".into()) }),
        OnOptions { id: Some("failing".to_string()), ..Default::default() },
    );
    runner.on(
        "pre",
        handler_fn(|_value| async move { Ok(HookAction::Patch(json!({"ok": true}))) }),
        OnOptions::default(),
    );

    let result = runner.run("pre", json!({})).await;

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].hook_id, "failing");
    assert_eq!(result.value, json!({"ok": true}));
    assert!(!result.blocked);
}

#[tokio::test]
async fn unregister_removes_the_handler() {
    let runner = HookRunner::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);

    let unregister = runner.on(
        "pre",
        handler_fn(move |_value| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            async move { Ok(HookAction::Continue) }
        }),
        OnOptions::default(),
    );

    unregister.call();
    runner.run("pre", json!(null)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn running_an_unknown_hook_is_a_harmless_passthrough() {
    let runner = HookRunner::new();
    let result = runner.run("missing", json!({"x": 1})).await;
    assert_eq!(result.value, json!({"x": 1}));
    assert!(!result.blocked);
    assert!(result.errors.is_empty());
}
