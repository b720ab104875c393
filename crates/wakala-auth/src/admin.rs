//! Staff account management, restricted to the `admin` role.

use wakala_core::{
  actor::{Actor, ActorContext, ActorKind, ActorRef, RoleName},
  store::WorkflowStore,
};

use crate::{
  error::{AuthError, Result},
  gateway::{AuthGateway, Registration},
};

impl<S: WorkflowStore> AuthGateway<S> {
  /// Create an employee or admin account in the user store.
  pub async fn create_staff(
    &self,
    ctx: &ActorContext,
    role: RoleName,
    input: Registration,
  ) -> Result<Actor> {
    require_admin(ctx)?;
    if !role.is_staff() {
      return Err(AuthError::InvalidRole { role, kind: ActorKind::User });
    }

    let actor = self.create_account(ActorKind::User, role, input).await?;
    tracing::info!(admin_id = %ctx.id, actor_id = %actor.id, %role, "staff account created");
    Ok(actor)
  }

  /// Replace the role of a user-store actor.
  pub async fn set_role(
    &self,
    ctx: &ActorContext,
    target: ActorRef,
    role: RoleName,
  ) -> Result<Actor> {
    require_admin(ctx)?;
    if !role.fits(target.kind) {
      return Err(AuthError::InvalidRole { role, kind: target.kind });
    }

    let updated = self
      .store
      .set_role(target, role)
      .await
      .map_err(AuthError::store)?;
    if !updated {
      return Err(AuthError::ActorNotFound { kind: target.kind, id: target.id });
    }

    tracing::info!(admin_id = %ctx.id, actor_id = %target.id, %role, "role changed");
    self.load_actor(target.kind, target.id).await
  }

  /// Delete an actor together with its role.
  pub async fn delete_actor(&self, ctx: &ActorContext, target: ActorRef) -> Result<()> {
    require_admin(ctx)?;
    if target == ctx.actor_ref() {
      return Err(AuthError::Validation("admins cannot delete themselves".into()));
    }

    let deleted = self
      .store
      .delete_actor(target)
      .await
      .map_err(AuthError::store)?;
    if !deleted {
      return Err(AuthError::ActorNotFound { kind: target.kind, id: target.id });
    }

    tracing::info!(admin_id = %ctx.id, actor_id = %target.id, kind = %target.kind, "actor deleted");
    Ok(())
  }
}

fn require_admin(ctx: &ActorContext) -> Result<()> {
  if ctx.has_role(RoleName::Admin) {
    Ok(())
  } else {
    tracing::debug!(actor_id = %ctx.id, "admin role required");
    Err(AuthError::Forbidden { required: RoleName::Admin })
  }
}
