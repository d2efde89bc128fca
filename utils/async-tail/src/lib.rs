//! Per-key "single async tail" primitive.
//!
//! Several kernel components need linearizable ordering for concurrent
//! async callers against one piece of state: the skill registry's
//! `install`/`enable`/`disable`/`uninstall` (spec §4.6) and the trace
//! serialiser's per-session writes (spec §4.9.6). The source material
//! expresses this as `next = prev.then(op)` promise chaining; per DESIGN
//! NOTES ("the per-session serialisation tails become single-writer
//! tasks owning a channel"), the idiomatic Rust shape is a background task
//! that owns an mpsc channel and drains submitted operations strictly in
//! submission order.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A FIFO tail: operations submitted via [`SerialTail::run`] execute one at
/// a time, in submission order, regardless of how many callers submit
/// concurrently.
pub struct SerialTail {
    tx: mpsc::UnboundedSender<BoxFuture>,
    worker: JoinHandle<()>,
}

impl SerialTail {
    /// Spawn a new tail backed by a dedicated worker task.
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<BoxFuture>();
        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job.await;
            }
        });
        Self { tx, worker }
    }

    /// Run `op` after every operation submitted before it on this tail has
    /// completed, returning its result once it finishes.
    ///
    /// A failed submission (the worker task is gone) is only possible if
    /// the tail itself has already been dropped and leaked its sender,
    /// which cannot happen through this type's public API.
    pub async fn run<F, T>(&self, op: F) -> T
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (resp_tx, resp_rx) = oneshot::channel();
        let job: BoxFuture = Box::pin(async move {
            let result = op.await;
            let _ = resp_tx.send(result);
        });
        let _ = self.tx.send(job);
        resp_rx
            .await
            .unwrap_or_else(|_| panic!("serial tail worker terminated before completing a job"))
    }

}

impl Default for SerialTail {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SerialTail {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
