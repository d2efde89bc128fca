use super::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn runs_ops_in_submission_order() {
    let tail = SerialTail::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    // `join_all`'s first poll round drives every future up to its first
    // await point in index order, so the channel sends happen 0..10 even
    // though the ops themselves finish out of order (earlier indices sleep
    // longer). If the tail didn't serialize, the log would come out sorted
    // by sleep duration instead of submission order.
    let futures = (0..10u64).map(|i| {
        let log = log.clone();
        tail.run(async move {
            sleep(Duration::from_millis(10 - i)).await;
            log.lock().unwrap_or_else(|e| e.into_inner()).push(i);
        })
    });
    futures::future::join_all(futures).await;

    let observed = log.lock().unwrap_or_else(|e| e.into_inner()).clone();
    assert_eq!(observed, (0..10u64).collect::<Vec<_>>());
}

#[tokio::test]
async fn returns_the_operations_result() {
    let tail = SerialTail::new();
    let value = tail.run(async { 42 }).await;
    assert_eq!(value, 42);
}
