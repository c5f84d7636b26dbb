// Shared test fixture for the CustomMessageText command input.

use crate::core::org::message_text::CustomMessageText;

pub struct CustomMessageTextBuilder {
    inner: CustomMessageText,
}

impl Default for CustomMessageTextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl CustomMessageTextBuilder {
    pub fn new() -> Self {
        Self {
            inner: CustomMessageText {
                template: "InitCode".to_string(),
                language: "en".to_string(),
                ..CustomMessageText::default()
            },
        }
    }

    pub fn template(mut self, v: impl Into<String>) -> Self {
        self.inner.template = v.into();
        self
    }

    pub fn language(mut self, v: impl Into<String>) -> Self {
        self.inner.language = v.into();
        self
    }

    pub fn greeting(mut self, v: impl Into<String>) -> Self {
        self.inner.greeting = v.into();
        self
    }

    pub fn subject(mut self, v: impl Into<String>) -> Self {
        self.inner.subject = v.into();
        self
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.inner.title = v.into();
        self
    }

    pub fn pre_header(mut self, v: impl Into<String>) -> Self {
        self.inner.pre_header = v.into();
        self
    }

    pub fn text(mut self, v: impl Into<String>) -> Self {
        self.inner.text = v.into();
        self
    }

    pub fn button_text(mut self, v: impl Into<String>) -> Self {
        self.inner.button_text = v.into();
        self
    }

    pub fn footer_text(mut self, v: impl Into<String>) -> Self {
        self.inner.footer_text = v.into();
        self
    }

    pub fn build(self) -> CustomMessageText {
        self.inner
    }
}
