// Remove an organization (irreversible).
//
// Flow
// - The protected set blocks removal before any store call.
// - Only the lifecycle slice of history is folded.
// - Removing an already removed org is a no-op, not an error.
// - The lower-bound guard tolerates unrelated appends between load and push.
//   A racing removal either conflicts or appends a second org.removed, which
//   reducers treat as idempotent.

use crate::application::commands::{CommandContext, Commands};
use crate::application::errors::CommandError;
use crate::core::eventstore::intent::{ConcurrencyGuard, PushIntent};
use crate::core::eventstore::write_model::{
    Lifecycle, ObjectDetails, WriteModel, append_and_reduce, load_write_model,
};
use crate::core::org::events::{OrgEvent, org_aggregate};
use crate::core::org::state::OrgWriteModel;

impl Commands {
    pub async fn remove_org(
        &self,
        ctx: &CommandContext,
        org_id: &str,
    ) -> Result<ObjectDetails, CommandError> {
        if org_id.is_empty() {
            return Err(CommandError::InvalidArgument("org id missing"));
        }
        if self.config.protected_org_ids.contains(org_id) {
            return Err(CommandError::PreconditionFailed(
                "org is protected and cannot be removed",
            ));
        }

        let mut existing = OrgWriteModel::new(&ctx.instance_id, org_id);
        load_write_model(self.eventstore.as_ref(), &mut existing).await?;
        if existing.state == Lifecycle::Removed {
            return Ok(existing.base().details());
        }

        let intent = PushIntent::new(org_aggregate(&ctx.instance_id, org_id), &ctx.editor)
            .with_guard(ConcurrencyGuard::SequenceAtLeast(
                existing.base().processed_sequence,
            ))
            .with_event(OrgEvent::Removed.to_proposed()?);

        let pushed = self.eventstore.push(intent).await?;
        self.record_audit(&pushed).await;
        append_and_reduce(&mut existing, &pushed);
        Ok(existing.base().details())
    }
}
