//! Tracing/logging bootstrap shared by the `kernel` facade and integration
//! tests.
//!
//! The kernel runs in-process inside a host; there is no OTLP network
//! export here (no embedded metrics pipeline — a Non-goal), only the
//! structured `tracing` subscriber every other crate logs through.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a global `tracing` subscriber reading its filter from
/// `RUST_LOG`, defaulting to `info` when unset. Safe to call more than
/// once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
