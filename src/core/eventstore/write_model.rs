// Write model fold mechanism.
//
// Purpose
// - Rebuild the current state of one aggregate (or composite sub-key) by
//   folding its ordered events, and derive post-command object details from it.
//
// Boundaries
// - Folding is deterministic and independent of batch boundaries. A batch that
//   starts behind the already processed sequence is a programming error, not a
//   recoverable runtime condition.

use chrono::{DateTime, Utc};

use crate::core::eventstore::event::PersistedEvent;
use crate::core::eventstore::search::SearchQuery;
use crate::core::ports::{EventStore, EventStoreError, Reducer};

/// Lifecycle tag shared by all write models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Unspecified,
    Active,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteModelBase {
    pub aggregate_id: String,
    pub instance_id: String,
    pub resource_owner: String,
    pub processed_sequence: u64,
    pub change_date: Option<DateTime<Utc>>,
}

impl WriteModelBase {
    pub fn new(instance_id: &str, aggregate_id: &str, resource_owner: &str) -> Self {
        Self {
            aggregate_id: aggregate_id.to_string(),
            instance_id: instance_id.to_string(),
            resource_owner: resource_owner.to_string(),
            processed_sequence: 0,
            change_date: None,
        }
    }

    pub fn details(&self) -> ObjectDetails {
        ObjectDetails {
            sequence: self.processed_sequence,
            change_date: self.change_date,
            resource_owner: self.resource_owner.clone(),
        }
    }
}

/// Post-push result metadata, derived by locally folding the pushed events
/// back into the write model that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDetails {
    pub sequence: u64,
    pub change_date: Option<DateTime<Utc>>,
    pub resource_owner: String,
}

pub trait WriteModel: Send {
    fn base(&self) -> &WriteModelBase;
    fn base_mut(&mut self) -> &mut WriteModelBase;

    /// The historical query restricted to the event types this model folds.
    fn query(&self) -> SearchQuery;

    /// Apply one event to the projected fields. Unknown event types must be
    /// ignored so older binaries keep folding newer histories.
    fn apply(&mut self, event: &PersistedEvent);

    /// Fold one ordered batch. Callable repeatedly across successive batches;
    /// a batch that starts behind the processed sequence is a bug in the
    /// caller.
    fn reduce(&mut self, events: &[PersistedEvent]) {
        if let Some(first) = events.first() {
            assert!(
                first.sequence >= self.base().processed_sequence,
                "event batch starts behind the processed sequence ({} < {})",
                first.sequence,
                self.base().processed_sequence,
            );
        }
        for event in events {
            // Re-delivery of already folded events is idempotent.
            if event.sequence <= self.base().processed_sequence {
                continue;
            }
            self.apply(event);
            let base = self.base_mut();
            base.processed_sequence = event.sequence;
            base.change_date = Some(event.created_at);
        }
    }
}

/// Adapts a write model to the store's reducer callback.
struct WriteModelReducer<'m, M: WriteModel>(&'m mut M);

impl<M: WriteModel> Reducer for WriteModelReducer<'_, M> {
    fn reduce(&mut self, events: &[PersistedEvent]) {
        self.0.reduce(events);
    }
}

/// Query the model's slice of history and fold it.
pub async fn load_write_model<M: WriteModel>(
    store: &dyn EventStore,
    model: &mut M,
) -> Result<(), EventStoreError> {
    let query = model.query();
    store.query(&query, &mut WriteModelReducer(model)).await
}

/// Fold freshly pushed events back into the model that produced them,
/// avoiding a redundant reload.
pub fn append_and_reduce<M: WriteModel>(model: &mut M, pushed: &[PersistedEvent]) {
    model.reduce(pushed);
}
