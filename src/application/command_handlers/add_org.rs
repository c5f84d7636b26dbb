// Create an organization.
//
// Flow
// - Validate discriminators before any store call.
// - Fold the lifecycle slice of history; an existing org blocks creation.
// - Creation uses the exact-match guard: two racing attempts must not both
//   append org.added.

use crate::application::commands::{CommandContext, Commands};
use crate::application::errors::CommandError;
use crate::core::eventstore::intent::{ConcurrencyGuard, PushIntent};
use crate::core::eventstore::write_model::{
    Lifecycle, ObjectDetails, WriteModel, append_and_reduce, load_write_model,
};
use crate::core::org::events::{OrgAddedPayload, OrgEvent, org_aggregate};
use crate::core::org::state::OrgWriteModel;

impl Commands {
    pub async fn add_org(
        &self,
        ctx: &CommandContext,
        org_id: &str,
        name: &str,
    ) -> Result<ObjectDetails, CommandError> {
        if org_id.is_empty() {
            return Err(CommandError::InvalidArgument("org id missing"));
        }
        if name.is_empty() {
            return Err(CommandError::InvalidArgument("org name missing"));
        }

        let mut existing = OrgWriteModel::new(&ctx.instance_id, org_id);
        load_write_model(self.eventstore.as_ref(), &mut existing).await?;
        if existing.state != Lifecycle::Unspecified {
            return Err(CommandError::PreconditionFailed("org already exists"));
        }

        let event = OrgEvent::Added(OrgAddedPayload {
            name: name.to_string(),
        });
        let intent = PushIntent::new(org_aggregate(&ctx.instance_id, org_id), &ctx.editor)
            .with_guard(ConcurrencyGuard::SequenceMatches(
                existing.base().processed_sequence,
            ))
            .with_event(event.to_proposed()?);

        let pushed = self.eventstore.push(intent).await?;
        self.record_audit(&pushed).await;
        append_and_reduce(&mut existing, &pushed);
        Ok(existing.base().details())
    }
}
