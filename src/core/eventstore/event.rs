// Event envelopes.
//
// Purpose
// - ProposedEvent: what one command attempt wants to append.
// - PersistedEvent: the immutable fact the store returns, with its assigned
//   sequence and timestamp.
//
// Versioning and evolution
// - Event type tags are a stable external contract consumed by downstream
//   projections. Renaming a tag is a breaking change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::eventstore::aggregate::AggregateRef;

#[derive(Debug, Clone, PartialEq)]
pub struct ProposedEvent {
    pub event_type: String,
    pub payload: serde_json::Value,
}

/// Sequence numbers are monotonic per aggregate and start at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEvent {
    pub id: Uuid,
    pub aggregate: AggregateRef,
    pub event_type: String,
    pub sequence: u64,
    pub payload: serde_json::Value,
    pub editor: String,
    pub created_at: DateTime<Utc>,
}
