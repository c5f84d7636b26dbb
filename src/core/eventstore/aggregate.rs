// Aggregate stream reference.
//
// Purpose
// - Identify one event stream: aggregate type and id, the owning resource,
//   and the tenant instance it lives in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRef {
    pub aggregate_type: String,
    pub id: String,
    pub resource_owner: String,
    pub instance_id: String,
}

impl AggregateRef {
    pub fn new(
        aggregate_type: impl Into<String>,
        id: impl Into<String>,
        resource_owner: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            aggregate_type: aggregate_type.into(),
            id: id.into(),
            resource_owner: resource_owner.into(),
            instance_id: instance_id.into(),
        }
    }
}
