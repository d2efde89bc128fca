//! Wall-clock, random-id, and token-estimation glue (spec §2 row 14).
//!
//! These are the only three primitives the kernel needs from the host
//! environment that aren't expressed as a trait in `talon-host` — they're
//! pure functions, not collaborators, so there's nothing to inject.

use chrono::SecondsFormat;
use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Current time as an ISO-8601 string with millisecond precision, UTC.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as milliseconds since the Unix epoch, UTC.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A random lowercase-alphanumeric id of the given length.
///
/// Not cryptographically significant — used for entry/task ids where
/// uniqueness-in-practice, not unforgeability, is what matters.
pub fn random_id(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Approximate token count for a piece of text.
///
/// Uses the 4-characters-per-token heuristic (spec §4.8): a consistent,
/// deterministic approximation is all the compaction engine's accounting
/// requires, not exact tokenizer parity with any particular model.
pub fn approx_token_count(text: &str) -> i64 {
    let chars = text.chars().count() as i64;
    chars.div_ceil(4)
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
