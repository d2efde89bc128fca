//! Legacy-state archiver and reset (spec §2 row 13, §6).
//!
//! Two one-shot migration operations, the kind every long-lived CLI agent
//! ends up carrying once it has shipped a prior on-disk shape: bundle the
//! old keys into a timestamped archive record before deleting them, and
//! sweep the store clean of everything the previous generation wrote.

mod error;

pub use error::LegacyError;
pub use error::Result;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use talon_host::KvStore;
use talon_ids::now_iso;

const ARCHIVE_INDEX_KEY: &str = "archive:legacy:index";

/// Key prefixes swept by [`reset_legacy_state`].
const LEGACY_PREFIXES: &[&str] = &[
    "session:meta:",
    "session:entries:",
    "trace:",
    "loop:",
    "planner:",
    "runtime:",
    "memory:",
    "brain-loop:",
];

/// Exact legacy keys swept by [`reset_legacy_state`] regardless of prefix.
const LEGACY_EXACT_KEYS: &[&str] = &["chatState", "chatState.v1", "chatState.v2"];

/// One bundled snapshot of a set of legacy keys, written under
/// `archive:legacy:<archived_at>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub archived_at: String,
    pub source: String,
    pub keys: Vec<String>,
    /// Missing keys are recorded as `null`, not omitted — a partial legacy
    /// shape still archives cleanly.
    pub data: BTreeMap<String, Option<Value>>,
}

/// Read every key in `keys` and bundle them into a new archive record.
/// Re-running with the same `source` creates another entry: archives are a
/// log, not a singleton.
pub async fn archive_legacy(kv: &dyn KvStore, source: &str, keys: &[String]) -> Result<ArchiveEntry> {
    let mut data = BTreeMap::new();
    for key in keys {
        let value = kv
            .kv_get(key)
            .await
            .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
        data.insert(key.clone(), value);
    }

    let archived_at = now_iso();
    let entry = ArchiveEntry {
        archived_at: archived_at.clone(),
        source: source.to_string(),
        keys: keys.to_vec(),
        data,
    };

    let archive_key = format!("archive:legacy:{archived_at}");
    let value = serde_json::to_value(&entry)
        .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
    kv.kv_set(&archive_key, value)
        .await
        .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;

    let mut index: Vec<String> = match kv
        .kv_get(ARCHIVE_INDEX_KEY)
        .await
        .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?
    {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?,
        None => Vec::new(),
    };
    index.push(archive_key);
    let index_value = serde_json::to_value(&index)
        .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
    kv.kv_set(ARCHIVE_INDEX_KEY, index_value)
        .await
        .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;

    Ok(entry)
}

/// Delete every key under the legacy prefixes plus the exact legacy keys.
/// Idempotent: running it against an already-clean store is a no-op.
///
/// Prefix matches depend on [`KvStore::keys_with_prefix`], an optional host
/// capability; hosts that return `Ok(vec![])` for it still get the exact
/// legacy keys deleted.
pub async fn reset_legacy_state(kv: &dyn KvStore) -> Result<()> {
    for prefix in LEGACY_PREFIXES {
        let keys = kv
            .keys_with_prefix(prefix)
            .await
            .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
        for key in keys {
            kv.kv_remove(&key)
                .await
                .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
        }
    }
    for key in LEGACY_EXACT_KEYS {
        kv.kv_remove(key)
            .await
            .map_err(|e| error::StorageSnafu { message: e.to_string() }.build())?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
