// Historical query filter.
//
// Purpose
// - Select events by aggregate type(s), aggregate id(s), event type(s),
//   tenant scope, and an optional exclusive minimum sequence.
//
// Semantics
// - Empty lists mean "no restriction" for that dimension.

use crate::core::eventstore::event::PersistedEvent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub aggregate_types: Vec<String>,
    pub aggregate_ids: Vec<String>,
    pub event_types: Vec<String>,
    pub instance_id: Option<String>,
    pub sequence_greater_than: Option<u64>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggregate_type(mut self, aggregate_type: impl Into<String>) -> Self {
        self.aggregate_types.push(aggregate_type.into());
        self
    }

    pub fn aggregate_id(mut self, aggregate_id: impl Into<String>) -> Self {
        self.aggregate_ids.push(aggregate_id.into());
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_types.push(event_type.into());
        self
    }

    pub fn instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn sequence_greater_than(mut self, sequence: u64) -> Self {
        self.sequence_greater_than = Some(sequence);
        self
    }

    pub fn matches(&self, event: &PersistedEvent) -> bool {
        if let Some(instance_id) = &self.instance_id {
            if &event.aggregate.instance_id != instance_id {
                return false;
            }
        }
        if !self.aggregate_types.is_empty()
            && !self.aggregate_types.contains(&event.aggregate.aggregate_type)
        {
            return false;
        }
        if !self.aggregate_ids.is_empty() && !self.aggregate_ids.contains(&event.aggregate.id) {
            return false;
        }
        if !self.event_types.is_empty() && !self.event_types.contains(&event.event_type) {
            return false;
        }
        if let Some(min) = self.sequence_greater_than {
            if event.sequence <= min {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod search_query_tests {
    use super::*;
    use crate::core::eventstore::aggregate::AggregateRef;
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn event() -> PersistedEvent {
        PersistedEvent {
            id: Uuid::now_v7(),
            aggregate: AggregateRef::new("org", "org-1", "org-1", "instance-1"),
            event_type: "org.added".to_string(),
            sequence: 3,
            payload: serde_json::Value::Null,
            editor: "admin-1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn it_should_match_everything_with_an_empty_query(event: PersistedEvent) {
        assert!(SearchQuery::new().matches(&event));
    }

    #[rstest]
    fn it_should_restrict_each_dimension_independently(event: PersistedEvent) {
        assert!(
            SearchQuery::new()
                .instance_id("instance-1")
                .aggregate_type("org")
                .aggregate_id("org-1")
                .event_type("org.added")
                .matches(&event)
        );
        assert!(!SearchQuery::new().instance_id("instance-2").matches(&event));
        assert!(!SearchQuery::new().aggregate_type("user").matches(&event));
        assert!(!SearchQuery::new().aggregate_id("org-2").matches(&event));
        assert!(!SearchQuery::new().event_type("org.removed").matches(&event));
    }

    #[rstest]
    fn it_should_treat_the_minimum_sequence_as_exclusive(event: PersistedEvent) {
        assert!(SearchQuery::new().sequence_greater_than(2).matches(&event));
        assert!(!SearchQuery::new().sequence_greater_than(3).matches(&event));
    }
}
