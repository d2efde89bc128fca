use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use talon_host::Result as HostResult;

use super::*;

#[derive(Default)]
struct MemoryKv {
    data: Mutex<HashMap<String, Value>>,
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn kv_get(&self, key: &str) -> HostResult<Option<Value>> {
        Ok(self.data.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned())
    }

    async fn kv_set(&self, key: &str, value: Value) -> HostResult<()> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), value);
        Ok(())
    }

    async fn kv_remove(&self, key: &str) -> HostResult<()> {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> HostResult<Vec<String>> {
        Ok(self
            .data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[tokio::test]
async fn archive_legacy_bundles_present_and_missing_keys() {
    let kv = MemoryKv::default();
    kv.kv_set("chatState", json!({"a": 1})).await.unwrap_or_else(|e| panic!("{e}"));

    let entry = archive_legacy(
        &kv,
        "config-load",
        &["chatState".to_string(), "missingKey".to_string()],
    )
    .await
    .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(entry.source, "config-load");
    assert_eq!(entry.data.get("chatState"), Some(&Some(json!({"a": 1}))));
    assert_eq!(entry.data.get("missingKey"), Some(&None));

    let archive_key = format!("archive:legacy:{}", entry.archived_at);
    assert!(kv.kv_get(&archive_key).await.unwrap_or_else(|e| panic!("{e}")).is_some());

    let index: Vec<String> = serde_json::from_value(
        kv.kv_get("archive:legacy:index").await.unwrap_or_else(|e| panic!("{e}")).unwrap_or_else(|| panic!("index missing")),
    )
    .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(index, vec![archive_key]);
}

#[tokio::test]
async fn archive_legacy_appends_to_the_index_on_repeated_calls() {
    let kv = MemoryKv::default();
    archive_legacy(&kv, "first", &[]).await.unwrap_or_else(|e| panic!("{e}"));
    archive_legacy(&kv, "second", &[]).await.unwrap_or_else(|e| panic!("{e}"));

    let index: Vec<String> = serde_json::from_value(
        kv.kv_get("archive:legacy:index").await.unwrap_or_else(|e| panic!("{e}")).unwrap_or_else(|| panic!("index missing")),
    )
    .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn reset_legacy_state_sweeps_prefixes_and_exact_keys() {
    let kv = MemoryKv::default();
    kv.kv_set("session:meta:abc", json!(1)).await.unwrap_or_else(|e| panic!("{e}"));
    kv.kv_set("trace:abc:0", json!(1)).await.unwrap_or_else(|e| panic!("{e}"));
    kv.kv_set("chatState.v2", json!(1)).await.unwrap_or_else(|e| panic!("{e}"));
    kv.kv_set("unrelated:key", json!(1)).await.unwrap_or_else(|e| panic!("{e}"));

    reset_legacy_state(&kv).await.unwrap_or_else(|e| panic!("{e}"));

    assert!(kv.kv_get("session:meta:abc").await.unwrap_or_else(|e| panic!("{e}")).is_none());
    assert!(kv.kv_get("trace:abc:0").await.unwrap_or_else(|e| panic!("{e}")).is_none());
    assert!(kv.kv_get("chatState.v2").await.unwrap_or_else(|e| panic!("{e}")).is_none());
    assert!(kv.kv_get("unrelated:key").await.unwrap_or_else(|e| panic!("{e}")).is_some());
}

#[tokio::test]
async fn reset_legacy_state_is_idempotent() {
    let kv = MemoryKv::default();
    reset_legacy_state(&kv).await.unwrap_or_else(|e| panic!("{e}"));
    reset_legacy_state(&kv).await.unwrap_or_else(|e| panic!("{e}"));
}
