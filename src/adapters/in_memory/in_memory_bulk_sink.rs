// In memory implementation of the BulkSink port.
//
// Purpose
// - Capture shipped bulks so debouncer tests can assert on them.
//
// Responsibilities
// - Record every delivered bulk in arrival order.
// - Optionally fail deliveries to exercise the logged-not-retried contract.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::ports::BulkSink;

#[derive(Default)]
pub struct InMemoryBulkSink<R> {
    bulks: Mutex<Vec<Vec<R>>>,
    offline: AtomicBool,
    attempts: AtomicUsize,
}

impl<R: Send + 'static> InMemoryBulkSink<R> {
    pub fn new() -> Self {
        Self {
            bulks: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    /// Number of delivery attempts, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub async fn bulks(&self) -> Vec<Vec<R>>
    where
        R: Clone,
    {
        self.bulks.lock().await.clone()
    }
}

#[async_trait]
impl<R: Send + 'static> BulkSink<R> for InMemoryBulkSink<R> {
    async fn send_bulk(&self, records: Vec<R>) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("bulk sink offline"));
        }
        self.bulks.lock().await.push(records);
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_bulk_sink_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_record_bulks_in_arrival_order() {
        let sink = InMemoryBulkSink::new();
        sink.send_bulk(vec!["a", "b"])
            .await
            .expect("expected the first bulk to be accepted");
        sink.send_bulk(vec!["c"])
            .await
            .expect("expected the second bulk to be accepted");
        assert_eq!(sink.bulks().await, vec![vec!["a", "b"], vec!["c"]]);
        assert_eq!(sink.attempts(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_and_drop_the_bulk_when_offline() {
        let sink = InMemoryBulkSink::new();
        sink.toggle_offline();
        let result = sink.send_bulk(vec!["a"]).await;
        assert!(result.is_err());
        assert!(sink.bulks().await.is_empty());
        assert_eq!(sink.attempts(), 1);
    }
}
