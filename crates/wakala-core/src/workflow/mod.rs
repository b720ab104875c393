//! Workflow engines for agencies and the issues that hang off them.
//!
//! [`Workflow`] is generic over any [`WorkflowStore`]. Each operation takes the
//! caller's [`ActorContext`] explicitly, checks the role and ownership rules,
//! computes the new state, and hands it to the store as a single atomic,
//! version-guarded write.

mod agency;
mod catalog;
mod issue;

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  actor::{Actor, ActorContext, ActorKind, ActorRef, RoleName},
  store::{CommitOutcome, WorkflowStore},
};

/// Tunables for the workflow engines.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
  /// Maximum agency requests a user may send to one lawyer per calendar day.
  pub daily_agency_limit: u32,
}

impl Default for WorkflowConfig {
  fn default() -> Self { Self { daily_agency_limit: 3 } }
}

/// The agency and issue workflow engine.
///
/// Cloning is cheap; the store is shared.
pub struct Workflow<S> {
  store:  Arc<S>,
  config: WorkflowConfig,
}

impl<S> Clone for Workflow<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: self.config.clone() }
  }
}

impl<S: WorkflowStore> Workflow<S> {
  pub fn new(store: Arc<S>, config: WorkflowConfig) -> Self {
    Self { store, config }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  async fn load_actor(&self, kind: ActorKind, id: Uuid) -> Result<Actor> {
    self
      .store
      .get_actor(ActorRef::new(kind, id))
      .await
      .map_err(Error::internal)?
      .ok_or(Error::ActorNotFound { kind, id })
  }
}

fn require_role(ctx: &ActorContext, role: RoleName) -> Result<()> {
  if ctx.has_role(role) {
    Ok(())
  } else {
    tracing::debug!(actor_id = %ctx.id, required = %role, "role check failed");
    Err(Error::Unauthorized { required: role })
  }
}

/// Trim `value` and reject it if nothing is left.
fn required_text(field: &str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(Error::Validation(format!("{field} is required")))
  } else {
    Ok(trimmed.to_owned())
  }
}

/// Translate a version-guarded write outcome for the record `id`.
fn settle<T>(
  outcome: CommitOutcome<T>,
  id: Uuid,
  duplicate_value: impl Fn(&'static str) -> String,
) -> Result<T> {
  match outcome {
    CommitOutcome::Committed(value) => Ok(value),
    CommitOutcome::Stale => Err(Error::ConflictingState(id)),
    CommitOutcome::Duplicate { field } => Err(Error::DuplicateNumber {
      field,
      value: duplicate_value(field),
    }),
    CommitOutcome::AgencyInactive { agency_id } => Err(Error::AgencyExpired(agency_id)),
  }
}
