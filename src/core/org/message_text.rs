// Localized message text templates.
//
// Purpose
// - CustomMessageText: the desired multi-field template for one
//   (template, language) pair.
// - MessageTextField: the independently settable fields, in the fixed order
//   diffs are computed.
// - MessageTextWriteModel: the persisted fields for one composite sub-key.
//
// Boundaries
// - No input or output here; the command handlers drive loading and pushing.

use crate::core::eventstore::event::PersistedEvent;
use crate::core::eventstore::search::SearchQuery;
use crate::core::eventstore::write_model::{Lifecycle, WriteModel, WriteModelBase};
use crate::core::org::events::{self, OrgEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomMessageText {
    pub template: String,
    pub language: String,
    pub greeting: String,
    pub subject: String,
    pub title: String,
    pub pre_header: String,
    pub text: String,
    pub button_text: String,
    pub footer_text: String,
}

impl CustomMessageText {
    pub fn is_valid(&self) -> bool {
        !self.template.is_empty() && !self.language.is_empty()
    }

    pub fn field(&self, field: MessageTextField) -> &str {
        match field {
            MessageTextField::Greeting => &self.greeting,
            MessageTextField::Subject => &self.subject,
            MessageTextField::Title => &self.title,
            MessageTextField::PreHeader => &self.pre_header,
            MessageTextField::Text => &self.text,
            MessageTextField::ButtonText => &self.button_text,
            MessageTextField::FooterText => &self.footer_text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTextField {
    Greeting,
    Subject,
    Title,
    PreHeader,
    Text,
    ButtonText,
    FooterText,
}

impl MessageTextField {
    /// Diff order is fixed so a given (desired, observed) pair always yields
    /// the same event list.
    pub const ALL: [MessageTextField; 7] = [
        MessageTextField::Greeting,
        MessageTextField::Subject,
        MessageTextField::Title,
        MessageTextField::PreHeader,
        MessageTextField::Text,
        MessageTextField::ButtonText,
        MessageTextField::FooterText,
    ];

    /// Stable field name carried in event payloads.
    pub fn key(self) -> &'static str {
        match self {
            MessageTextField::Greeting => "Greeting",
            MessageTextField::Subject => "Subject",
            MessageTextField::Title => "Title",
            MessageTextField::PreHeader => "PreHeader",
            MessageTextField::Text => "Text",
            MessageTextField::ButtonText => "ButtonText",
            MessageTextField::FooterText => "FooterText",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageTextWriteModel {
    base: WriteModelBase,
    pub template: String,
    pub language: String,
    pub state: Lifecycle,
    pub greeting: String,
    pub subject: String,
    pub title: String,
    pub pre_header: String,
    pub text: String,
    pub button_text: String,
    pub footer_text: String,
}

impl MessageTextWriteModel {
    pub fn new(instance_id: &str, org_id: &str, template: &str, language: &str) -> Self {
        Self {
            base: WriteModelBase::new(instance_id, org_id, org_id),
            template: template.to_string(),
            language: language.to_string(),
            ..Default::default()
        }
    }

    pub fn field(&self, field: MessageTextField) -> &str {
        match field {
            MessageTextField::Greeting => &self.greeting,
            MessageTextField::Subject => &self.subject,
            MessageTextField::Title => &self.title,
            MessageTextField::PreHeader => &self.pre_header,
            MessageTextField::Text => &self.text,
            MessageTextField::ButtonText => &self.button_text,
            MessageTextField::FooterText => &self.footer_text,
        }
    }

    fn set_field(&mut self, field: MessageTextField, value: String) {
        match field {
            MessageTextField::Greeting => self.greeting = value,
            MessageTextField::Subject => self.subject = value,
            MessageTextField::Title => self.title = value,
            MessageTextField::PreHeader => self.pre_header = value,
            MessageTextField::Text => self.text = value,
            MessageTextField::ButtonText => self.button_text = value,
            MessageTextField::FooterText => self.footer_text = value,
        }
    }

    fn clear_all(&mut self) {
        for field in MessageTextField::ALL {
            self.set_field(field, String::new());
        }
    }

    fn is_own_template(&self, template: &str, language: &str) -> bool {
        self.template == template && self.language == language
    }
}

impl WriteModel for MessageTextWriteModel {
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
            .event_type(events::CUSTOM_TEXT_SET)
            .event_type(events::CUSTOM_TEXT_REMOVED)
            .event_type(events::CUSTOM_TEXT_TEMPLATE_REMOVED)
    }

    fn apply(&mut self, event: &PersistedEvent) {
        match OrgEvent::from_persisted(event) {
            Some(OrgEvent::CustomTextSet(payload))
                if self.is_own_template(&payload.template, &payload.language) =>
            {
                if let Some(field) = MessageTextField::from_key(&payload.key) {
                    self.set_field(field, payload.text);
                    self.state = Lifecycle::Active;
                }
            }
            Some(OrgEvent::CustomTextRemoved(payload))
                if self.is_own_template(&payload.template, &payload.language) =>
            {
                if let Some(field) = MessageTextField::from_key(&payload.key) {
                    self.set_field(field, String::new());
                }
            }
            Some(OrgEvent::CustomTextTemplateRemoved(payload))
                if self.is_own_template(&payload.template, &payload.language) =>
            {
                self.clear_all();
                self.state = Lifecycle::Removed;
            }
            _ => {}
        }
    }
}
