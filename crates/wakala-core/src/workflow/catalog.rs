//! The catalog of authorizations a lawyer can attach when forwarding.

use super::{Workflow, required_text};
use crate::{
  Error, Result,
  actor::{ActorContext, RoleName},
  authorization::Authorization,
  store::WorkflowStore,
};

impl<S: WorkflowStore> Workflow<S> {
  /// Staff add a named authorization to the catalog.
  pub async fn add_authorization(
    &self,
    ctx: &ActorContext,
    name: &str,
  ) -> Result<Authorization> {
    if !ctx.role.is_some_and(RoleName::is_staff) {
      tracing::debug!(actor_id = %ctx.id, "catalog change refused");
      return Err(Error::Unauthorized { required: RoleName::Employee });
    }
    let name = required_text("name", name)?;

    let authorization = self
      .store
      .add_authorization(Authorization::new(name))
      .await
      .map_err(Error::internal)?;
    tracing::info!(
      authorization_id = %authorization.id,
      name = %authorization.name,
      "authorization added"
    );
    Ok(authorization)
  }

  /// The whole catalog, by name.
  pub async fn authorizations(&self) -> Result<Vec<Authorization>> {
    self
      .store
      .list_authorizations()
      .await
      .map_err(Error::internal)
  }
}
