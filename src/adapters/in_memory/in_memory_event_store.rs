// In memory implementation of the EventStore port.
//
// Purpose
// - Support command handler tests and local development without a database.
//
// Responsibilities
// - Store events per aggregate stream, with per-aggregate sequences starting
//   at 1.
// - Enforce the concurrency guard under the write lock, so pushes to one
//   aggregate serialize.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::eventstore::event::PersistedEvent;
use crate::core::eventstore::intent::PushIntent;
use crate::core::eventstore::search::SearchQuery;
use crate::core::ports::{EventStore, EventStoreError, Reducer};

type StreamKey = (String, String, String); // (instance_id, aggregate_type, aggregate_id)

#[derive(Default)]
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<StreamKey, Vec<PersistedEvent>>>,
    offline: AtomicBool,
    query_count: AtomicUsize,
    push_count: AtomicUsize,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with Unavailable, to exercise error propagation.
    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    pub fn push_count(&self) -> usize {
        self.push_count.load(Ordering::SeqCst)
    }

    /// All events of one aggregate, oldest first.
    pub async fn stream(
        &self,
        instance_id: &str,
        aggregate_type: &str,
        aggregate_id: &str,
    ) -> Vec<PersistedEvent> {
        let key = (
            instance_id.to_string(),
            aggregate_type.to_string(),
            aggregate_id.to_string(),
        );
        self.streams
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    fn check_offline(&self) -> Result<(), EventStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(EventStoreError::Unavailable(
                "event store offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn query(
        &self,
        query: &SearchQuery,
        reducer: &mut dyn Reducer,
    ) -> Result<(), EventStoreError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        self.check_offline()?;

        let matched = {
            let guard = self.streams.read().await;
            let mut keys: Vec<&StreamKey> = guard.keys().collect();
            keys.sort();
            let mut matched = Vec::new();
            for key in keys {
                // Within one aggregate the stream is already in sequence order.
                for event in &guard[key] {
                    if query.matches(event) {
                        matched.push(event.clone());
                    }
                }
            }
            matched
        };

        reducer.reduce(&matched);
        Ok(())
    }

    async fn push(&self, intent: PushIntent) -> Result<Vec<PersistedEvent>, EventStoreError> {
        self.push_count.fetch_add(1, Ordering::SeqCst);
        self.check_offline()?;

        let PushIntent {
            aggregate,
            editor,
            events,
            guard,
        } = intent;

        let mut streams = self.streams.write().await;
        let key = (
            aggregate.instance_id.clone(),
            aggregate.aggregate_type.clone(),
            aggregate.id.clone(),
        );
        let stream = streams.entry(key).or_default();
        let persisted_sequence = stream.last().map(|e| e.sequence).unwrap_or(0);
        if !guard.holds(persisted_sequence) {
            return Err(EventStoreError::ConcurrencyConflict {
                required: guard,
                actual: persisted_sequence,
            });
        }

        let now = Utc::now();
        let mut pushed = Vec::with_capacity(events.len());
        for (offset, event) in events.into_iter().enumerate() {
            let persisted = PersistedEvent {
                id: Uuid::now_v7(),
                aggregate: aggregate.clone(),
                event_type: event.event_type,
                sequence: persisted_sequence + offset as u64 + 1,
                payload: event.payload,
                editor: editor.clone(),
                created_at: now,
            };
            stream.push(persisted.clone());
            pushed.push(persisted);
        }
        Ok(pushed)
    }
}
