// Org lifecycle write model.
//
// Purpose
// - Fold only creation and removal events: removal decisions need the current
//   lifecycle tag and last sequence, not the full history.

use crate::core::eventstore::event::PersistedEvent;
use crate::core::eventstore::search::SearchQuery;
use crate::core::eventstore::write_model::{Lifecycle, WriteModel, WriteModelBase};
use crate::core::org::events::{self, OrgEvent};

#[derive(Debug, Clone, Default)]
pub struct OrgWriteModel {
    base: WriteModelBase,
    pub state: Lifecycle,
    pub name: String,
}

impl OrgWriteModel {
    pub fn new(instance_id: &str, org_id: &str) -> Self {
        Self {
            base: WriteModelBase::new(instance_id, org_id, org_id),
            state: Lifecycle::Unspecified,
            name: String::new(),
        }
    }
}

impl WriteModel for OrgWriteModel {
    fn base(&self) -> &WriteModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WriteModelBase {
        &mut self.base
    }

    fn query(&self) -> SearchQuery {
        SearchQuery::new()
            .instance_id(&self.base.instance_id)
            .aggregate_type(events::AGGREGATE_TYPE)
            .aggregate_id(&self.base.aggregate_id)
            .event_type(events::ORG_ADDED)
            .event_type(events::ORG_REMOVED)
    }

    fn apply(&mut self, event: &PersistedEvent) {
        match OrgEvent::from_persisted(event) {
            Some(OrgEvent::Added(payload)) => {
                self.state = Lifecycle::Active;
                self.name = payload.name;
            }
            // A second removal leaves the state terminal.
            Some(OrgEvent::Removed) => self.state = Lifecycle::Removed,
            _ => {}
        }
    }
}

#[cfg(test)]
mod org_write_model_tests {
    use super::*;
    use crate::core::org::events::{OrgAddedPayload, org_aggregate};
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn persisted(sequence: u64, event: &OrgEvent) -> PersistedEvent {
        let proposed = event.to_proposed().expect("expected a proposed event");
        PersistedEvent {
            id: Uuid::now_v7(),
            aggregate: org_aggregate("instance-1", "org-1"),
            event_type: proposed.event_type,
            sequence,
            payload: proposed.payload,
            editor: "admin-1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn it_should_start_unspecified() {
        let model = OrgWriteModel::new("instance-1", "org-1");
        assert_eq!(model.state, Lifecycle::Unspecified);
        assert_eq!(model.base().processed_sequence, 0);
    }

    #[rstest]
    fn it_should_become_active_then_removed() {
        let mut model = OrgWriteModel::new("instance-1", "org-1");
        model.reduce(&[persisted(
            1,
            &OrgEvent::Added(OrgAddedPayload {
                name: "acme".to_string(),
            }),
        )]);
        assert_eq!(model.state, Lifecycle::Active);
        assert_eq!(model.name, "acme");

        model.reduce(&[persisted(2, &OrgEvent::Removed)]);
        assert_eq!(model.state, Lifecycle::Removed);
        assert_eq!(model.base().processed_sequence, 2);
    }

    #[rstest]
    fn it_should_stay_removed_on_a_duplicate_terminal_event() {
        let mut model = OrgWriteModel::new("instance-1", "org-1");
        model.reduce(&[
            persisted(1, &OrgEvent::Removed),
            persisted(2, &OrgEvent::Removed),
        ]);
        assert_eq!(model.state, Lifecycle::Removed);
        assert_eq!(model.base().processed_sequence, 2);
    }

    #[rstest]
    fn it_should_query_only_the_lifecycle_event_types() {
        let query = OrgWriteModel::new("instance-1", "org-1").query();
        assert_eq!(query.event_types, vec!["org.added", "org.removed"]);
        assert_eq!(query.aggregate_ids, vec!["org-1"]);
        assert_eq!(query.instance_id.as_deref(), Some("instance-1"));
    }
}
