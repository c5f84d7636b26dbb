// Command facade for the org write path.
//
// Responsibilities
// - Hold the event store handle and the explicit command configuration.
// - Hand audit records to the debounced shipper after successful pushes,
//   never waiting on or observing the flush outcome.
//
// Concurrency
// - Invocations are independent; no write model outlives one invocation. All
//   coordination happens through the store's per-aggregate guard at push time.
//   Dropping a command future before push returns leaves no partially visible
//   events, because push is atomic per intent and nothing is applied locally
//   before the push result arrives.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::adapters::debouncer::Debouncer;
use crate::core::eventstore::event::PersistedEvent;
use crate::core::ports::EventStore;

/// Per-invocation identity: the tenant scope and the acting editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub instance_id: String,
    pub editor: String,
}

impl CommandContext {
    pub fn new(instance_id: impl Into<String>, editor: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            editor: editor.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandsConfig {
    /// Orgs that must never be removed (e.g. the instance default org).
    pub protected_org_ids: HashSet<String>,
}

/// One ancillary audit row per persisted event, shipped in bulk.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub event_id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub sequence: u64,
    pub editor: String,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn from_event(event: &PersistedEvent) -> Self {
        Self {
            event_id: event.id,
            aggregate_type: event.aggregate.aggregate_type.clone(),
            aggregate_id: event.aggregate.id.clone(),
            event_type: event.event_type.clone(),
            sequence: event.sequence,
            editor: event.editor.clone(),
            created_at: event.created_at,
        }
    }
}

pub struct Commands {
    pub(crate) eventstore: Arc<dyn EventStore>,
    pub(crate) config: CommandsConfig,
    pub(crate) audit: Option<Arc<Debouncer<AuditRecord>>>,
}

impl Commands {
    pub fn new(eventstore: Arc<dyn EventStore>, config: CommandsConfig) -> Self {
        Self {
            eventstore,
            config,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: Arc<Debouncer<AuditRecord>>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Fire-and-forget: buffering only, the flush happens elsewhere.
    pub(crate) async fn record_audit(&self, pushed: &[PersistedEvent]) {
        let Some(audit) = &self.audit else { return };
        for event in pushed {
            audit.add(AuditRecord::from_event(event)).await;
        }
    }
}
