// Ports define what the core needs from the outside world, without implementing it.
//
// Purpose
// - Describe abstract input and output capabilities as traits (EventStore, BulkSink).
//
// Responsibilities
// - Keep the core independent of any database or broker by coding against traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the adapters layer.
//
// Testing guidance
// - Provide in memory implementations for tests and local development.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::eventstore::event::PersistedEvent;
use crate::core::eventstore::intent::{ConcurrencyGuard, PushIntent};
use crate::core::eventstore::search::SearchQuery;

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("concurrency conflict: required {required:?}, persisted sequence {actual}")]
    ConcurrencyConflict {
        required: ConcurrencyGuard,
        actual: u64,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("payload serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Receives event batches from a query, oldest first.
pub trait Reducer: Send {
    fn reduce(&mut self, events: &[PersistedEvent]);
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Stream events matching the query, per aggregate in ascending sequence
    /// order, into the reducer.
    async fn query(
        &self,
        query: &SearchQuery,
        reducer: &mut dyn Reducer,
    ) -> Result<(), EventStoreError>;

    /// Atomically append the intent's events to its aggregate, assigning
    /// contiguous sequence numbers, if the concurrency guard still holds
    /// against the persisted sequence at commit time. Partial appends never
    /// happen.
    async fn push(&self, intent: PushIntent) -> Result<Vec<PersistedEvent>, EventStoreError>;

    /// Apply each intent independently: a conflicting intent does not block
    /// unrelated intents in the same call.
    async fn push_many(
        &self,
        intents: Vec<PushIntent>,
    ) -> Vec<Result<Vec<PersistedEvent>, EventStoreError>> {
        let mut results = Vec::with_capacity(intents.len());
        for intent in intents {
            results.push(self.push(intent).await);
        }
        results
    }
}

#[async_trait]
pub trait BulkSink<R: Send + 'static>: Send + Sync {
    async fn send_bulk(&self, records: Vec<R>) -> anyhow::Result<()>;
}
