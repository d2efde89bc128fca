//! Per-session run-state machine (spec §4.9.2).

use talon_types::DequeueMode;
use talon_types::QueuedPrompt;
use talon_types::SessionId;

/// Retry bookkeeping folded into [`RunState`]. `attempt <= max_attempts`
/// always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryState {
    pub active: bool,
    pub attempt: i32,
    pub max_attempts: i32,
    pub delay_ms: i64,
}

/// The steer/follow-up prompt queue folded into [`RunState`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueueState {
    pub dequeue_mode: DequeueMode,
    pub steer: Vec<QueuedPrompt>,
    pub follow_up: Vec<QueuedPrompt>,
}

/// `{sessionId, running, compacting, paused, stopped, retry, queue}`.
///
/// Invariants: `running => !stopped`; `compacting => running`;
/// `retry.attempt <= retry.max_attempts`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub session_id: SessionId,
    pub running: bool,
    pub compacting: bool,
    pub paused: bool,
    pub stopped: bool,
    pub retry: RetryState,
    pub queue: QueueState,
}

impl RunState {
    /// A freshly created session: nothing running, queues empty.
    pub fn create_session(session_id: SessionId, max_attempts: i32, dequeue_mode: DequeueMode) -> Self {
        Self {
            session_id,
            running: false,
            compacting: false,
            paused: false,
            stopped: false,
            retry: RetryState { active: false, attempt: 0, max_attempts, delay_ms: 0 },
            queue: QueueState { dequeue_mode, steer: Vec::new(), follow_up: Vec::new() },
        }
    }

    /// Idempotent.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Clears both queues; leaves `running` to the next tick of the
    /// consumer.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.queue.steer.clear();
        self.queue.follow_up.clear();
    }

    /// Does not touch retry state or the queues.
    pub fn restart(&mut self) {
        self.stopped = false;
        self.paused = false;
    }

    /// `setRunning(false)` forces `compacting=false`: compaction cannot
    /// outlive running.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
        if !running {
            self.compacting = false;
        }
    }

    /// Setting `compacting=true` while not running is rejected, preserving
    /// the `compacting => running` invariant.
    pub fn set_compacting(&mut self, compacting: bool) {
        self.compacting = compacting && self.running;
    }
}

#[cfg(test)]
#[path = "run_state.test.rs"]
mod tests;
