// Upsert or clear the localized message text template of an org.
//
// Flow
// - Compare each field of the desired template against the folded state, in
//   fixed field order; a changed non-empty value emits org.customtext.set, a
//   cleared one emits org.customtext.removed.
// - An empty diff skips the push entirely and returns the unchanged details.
// - All emitted events are pushed as one intent: the template update is
//   all-or-nothing.

use crate::application::commands::{CommandContext, Commands};
use crate::application::errors::CommandError;
use crate::core::eventstore::intent::{ConcurrencyGuard, PushIntent};
use crate::core::eventstore::write_model::{
    Lifecycle, ObjectDetails, WriteModel, append_and_reduce, load_write_model,
};
use crate::core::org::events::{
    CustomTextRemovedPayload, CustomTextSetPayload, CustomTextTemplateRemovedPayload, OrgEvent,
    org_aggregate,
};
use crate::core::org::message_text::{CustomMessageText, MessageTextField, MessageTextWriteModel};

impl Commands {
    pub async fn set_org_message_text(
        &self,
        ctx: &CommandContext,
        resource_owner: &str,
        message: &CustomMessageText,
    ) -> Result<ObjectDetails, CommandError> {
        if resource_owner.is_empty() {
            return Err(CommandError::InvalidArgument("resource owner missing"));
        }
        if !message.is_valid() {
            return Err(CommandError::InvalidArgument(
                "message template or language missing",
            ));
        }

        let mut existing = MessageTextWriteModel::new(
            &ctx.instance_id,
            resource_owner,
            &message.template,
            &message.language,
        );
        load_write_model(self.eventstore.as_ref(), &mut existing).await?;

        let events = message_text_diff(&existing, message);
        if events.is_empty() {
            return Ok(existing.base().details());
        }

        let mut intent = PushIntent::new(org_aggregate(&ctx.instance_id, resource_owner), &ctx.editor)
            .with_guard(ConcurrencyGuard::SequenceAtLeast(
                existing.base().processed_sequence,
            ));
        for event in &events {
            intent = intent.with_event(event.to_proposed()?);
        }

        let pushed = self.eventstore.push(intent).await?;
        self.record_audit(&pushed).await;
        append_and_reduce(&mut existing, &pushed);
        Ok(existing.base().details())
    }

    pub async fn remove_org_message_texts(
        &self,
        ctx: &CommandContext,
        resource_owner: &str,
        template: &str,
        language: &str,
    ) -> Result<ObjectDetails, CommandError> {
        if resource_owner.is_empty() {
            return Err(CommandError::InvalidArgument("resource owner missing"));
        }
        if template.is_empty() || language.is_empty() {
            return Err(CommandError::InvalidArgument(
                "message template or language missing",
            ));
        }

        let mut existing =
            MessageTextWriteModel::new(&ctx.instance_id, resource_owner, template, language);
        load_write_model(self.eventstore.as_ref(), &mut existing).await?;
        if existing.state == Lifecycle::Unspecified || existing.state == Lifecycle::Removed {
            return Err(CommandError::NotFound("message text template not found"));
        }

        let event = OrgEvent::CustomTextTemplateRemoved(CustomTextTemplateRemovedPayload {
            template: template.to_string(),
            language: language.to_string(),
        });
        let intent = PushIntent::new(org_aggregate(&ctx.instance_id, resource_owner), &ctx.editor)
            .with_guard(ConcurrencyGuard::SequenceAtLeast(
                existing.base().processed_sequence,
            ))
            .with_event(event.to_proposed()?);

        let pushed = self.eventstore.push(intent).await?;
        self.record_audit(&pushed).await;
        append_and_reduce(&mut existing, &pushed);
        Ok(existing.base().details())
    }
}

/// One Set or Removed event per field whose desired value differs from the
/// observed one, in fixed field order.
fn message_text_diff(
    existing: &MessageTextWriteModel,
    desired: &CustomMessageText,
) -> Vec<OrgEvent> {
    let mut events = Vec::new();
    for field in MessageTextField::ALL {
        let observed = existing.field(field);
        let wanted = desired.field(field);
        if observed == wanted {
            continue;
        }
        if wanted.is_empty() {
            events.push(OrgEvent::CustomTextRemoved(CustomTextRemovedPayload {
                template: desired.template.clone(),
                key: field.key().to_string(),
                language: desired.language.clone(),
            }));
        } else {
            events.push(OrgEvent::CustomTextSet(CustomTextSetPayload {
                template: desired.template.clone(),
                key: field.key().to_string(),
                language: desired.language.clone(),
                text: wanted.to_string(),
            }));
        }
    }
    events
}
