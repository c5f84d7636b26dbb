// Org domain events.
//
// Purpose
// - Closed union of the facts recorded for the org aggregate, with their
//   stable wire tags.
//
// Versioning and evolution
// - Tags and payload shapes are consumed by downstream projections. Prefer
//   additive changes; do not change the meaning of historical events.

use serde::{Deserialize, Serialize};

use crate::core::eventstore::aggregate::AggregateRef;
use crate::core::eventstore::event::{PersistedEvent, ProposedEvent};
use crate::core::ports::EventStoreError;

pub const AGGREGATE_TYPE: &str = "org";

pub const ORG_ADDED: &str = "org.added";
pub const ORG_REMOVED: &str = "org.removed";
pub const CUSTOM_TEXT_SET: &str = "org.customtext.set";
pub const CUSTOM_TEXT_REMOVED: &str = "org.customtext.removed";
pub const CUSTOM_TEXT_TEMPLATE_REMOVED: &str = "org.customtext.template.removed";

/// Reference to an org's own event stream. An org owns itself.
pub fn org_aggregate(instance_id: &str, org_id: &str) -> AggregateRef {
    AggregateRef::new(AGGREGATE_TYPE, org_id, org_id, instance_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgAddedPayload {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTextSetPayload {
    pub template: String,
    pub key: String,
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTextRemovedPayload {
    pub template: String,
    pub key: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTextTemplateRemovedPayload {
    pub template: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgEvent {
    Added(OrgAddedPayload),
    Removed,
    CustomTextSet(CustomTextSetPayload),
    CustomTextRemoved(CustomTextRemovedPayload),
    CustomTextTemplateRemoved(CustomTextTemplateRemovedPayload),
}

impl OrgEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            OrgEvent::Added(_) => ORG_ADDED,
            OrgEvent::Removed => ORG_REMOVED,
            OrgEvent::CustomTextSet(_) => CUSTOM_TEXT_SET,
            OrgEvent::CustomTextRemoved(_) => CUSTOM_TEXT_REMOVED,
            OrgEvent::CustomTextTemplateRemoved(_) => CUSTOM_TEXT_TEMPLATE_REMOVED,
        }
    }

    /// Serialize into the envelope a push intent carries.
    pub fn to_proposed(&self) -> Result<ProposedEvent, EventStoreError> {
        let payload = match self {
            OrgEvent::Added(payload) => serde_json::to_value(payload)?,
            OrgEvent::Removed => serde_json::Value::Null,
            OrgEvent::CustomTextSet(payload) => serde_json::to_value(payload)?,
            OrgEvent::CustomTextRemoved(payload) => serde_json::to_value(payload)?,
            OrgEvent::CustomTextTemplateRemoved(payload) => serde_json::to_value(payload)?,
        };
        Ok(ProposedEvent {
            event_type: self.event_type().to_string(),
            payload,
        })
    }

    /// Decode a persisted event. Unrecognized or undecodable types yield None
    /// so older binaries keep folding newer histories.
    pub fn from_persisted(event: &PersistedEvent) -> Option<OrgEvent> {
        match event.event_type.as_str() {
            ORG_ADDED => serde_json::from_value(event.payload.clone())
                .ok()
                .map(OrgEvent::Added),
            ORG_REMOVED => Some(OrgEvent::Removed),
            CUSTOM_TEXT_SET => serde_json::from_value(event.payload.clone())
                .ok()
                .map(OrgEvent::CustomTextSet),
            CUSTOM_TEXT_REMOVED => serde_json::from_value(event.payload.clone())
                .ok()
                .map(OrgEvent::CustomTextRemoved),
            CUSTOM_TEXT_TEMPLATE_REMOVED => serde_json::from_value(event.payload.clone())
                .ok()
                .map(OrgEvent::CustomTextTemplateRemoved),
            _ => None,
        }
    }
}
