//! The KV store collaborator (spec §1, §6).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn kv_get(&self, key: &str) -> Result<Option<Value>>;
    async fn kv_set(&self, key: &str, value: Value) -> Result<()>;
    async fn kv_remove(&self, key: &str) -> Result<()>;

    /// Optional capability: list every key with the given prefix.
    ///
    /// The spec's KV interface (§6) exposes no scan primitive; hosts that
    /// back the KV store with something scannable (a directory, a SQL
    /// table) can implement this so `reset_legacy_state` (spec §4.9 /
    /// component 13) can do more than delete the handful of exact legacy
    /// keys it's told about. Hosts that can't support a scan return `Ok(
    /// vec![])`, which is the default.
    async fn keys_with_prefix(&self, _prefix: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
