//! Kernel-wide tunables (spec §4.8, §4.9.4, §4.9.6).

use serde::Deserialize;
use serde::Serialize;

fn default_keep_tail() -> usize {
    30
}

fn default_true() -> bool {
    true
}

fn default_max_summary_chars() -> usize {
    1800
}

/// Compaction engine defaults (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompactionConfig {
    pub threshold_tokens: usize,
    #[serde(default = "default_keep_tail")]
    pub keep_tail: usize,
    #[serde(default = "default_true")]
    pub split_turn: bool,
    #[serde(default = "default_max_summary_chars")]
    pub max_summary_chars: usize,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            threshold_tokens: 0,
            keep_tail: default_keep_tail(),
            split_turn: true,
            max_summary_chars: default_max_summary_chars(),
        }
    }
}

fn default_ring_cap() -> usize {
    240
}

fn default_chunk_size() -> usize {
    80
}

/// Trace serialiser ring buffer / persistence chunk sizes (spec §3, §4.9.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_ring_cap")]
    pub ring_cap: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            ring_cap: default_ring_cap(),
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_retry_base_ms() -> u64 {
    500
}

fn default_retry_cap_ms() -> u64 {
    5000
}

/// Retry backoff defaults (spec §4.9.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_retry_base_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_retry_cap_ms")]
    pub cap_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_retry_base_ms(),
            cap_delay_ms: default_retry_cap_ms(),
        }
    }
}

/// Top-level kernel tunables document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default)]
    pub compaction: CompactionConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[cfg(test)]
#[path = "kernel.test.rs"]
mod tests;
