use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn kernel_config_fills_in_defaults() {
    let config: KernelConfig = serde_json::from_value(json!({
        "compaction": {"threshold_tokens": 4000}
    }))
    .unwrap_or_else(|e| panic!("deserialize failed: {e}"));

    assert_eq!(config.compaction.threshold_tokens, 4000);
    assert_eq!(config.compaction.keep_tail, 30);
    assert!(config.compaction.split_turn);
    assert_eq!(config.compaction.max_summary_chars, 1800);
    assert_eq!(config.trace.ring_cap, 240);
    assert_eq!(config.trace.chunk_size, 80);
    assert_eq!(config.retry.base_delay_ms, 500);
    assert_eq!(config.retry.cap_delay_ms, 5000);
}

#[test]
fn empty_document_uses_every_default() {
    let config: KernelConfig = serde_json::from_value(json!({}))
        .unwrap_or_else(|e| panic!("deserialize failed: {e}"));
    assert_eq!(config.compaction.threshold_tokens, 0);
}
