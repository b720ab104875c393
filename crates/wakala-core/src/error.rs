//! Error types for `wakala-core`.
//!
//! Every variant maps onto one [`ErrorKind`], the coarse taxonomy callers
//! translate into transport status codes.

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use thiserror::Error;
use uuid::Uuid;

use crate::actor::{ActorKind, RoleName};

/// The failure classes surfaced across the workflow boundary.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  Unauthorized,
  InvalidTransition,
  RateLimited,
  Conflict,
  ValidationFailed,
  Internal,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("agency not found: {0}")]
  AgencyNotFound(Uuid),

  #[error("issue not found: {0}")]
  IssueNotFound(Uuid),

  #[error("{kind} not found: {id}")]
  ActorNotFound { kind: ActorKind, id: Uuid },

  #[error("authorization not found: {0}")]
  AuthorizationNotFound(Uuid),

  #[error("role {required} is required for this action")]
  Unauthorized { required: RoleName },

  #[error("agency {0} has already been resolved")]
  AlreadyResolved(Uuid),

  #[error("agency {0} is not active")]
  AgencyNotActive(Uuid),

  #[error("agency {0} has expired")]
  AgencyExpired(Uuid),

  #[error("issue {0} is already finished")]
  AlreadyFinished(Uuid),

  #[error("end date must be after the start date")]
  EndBeforeStart,

  #[error("end date and success rate must be supplied together")]
  IncompleteFinishData,

  #[error("daily limit of {limit} requests to this lawyer reached")]
  RateLimited { limit: u32 },

  #[error("{field} {value:?} is already in use")]
  DuplicateNumber { field: &'static str, value: String },

  #[error("email {0:?} is already registered")]
  EmailTaken(String),

  #[error("record {0} was modified concurrently")]
  ConflictingState(Uuid),

  #[error("invalid input: {0}")]
  Validation(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::AgencyNotFound(_)
      | Self::IssueNotFound(_)
      | Self::ActorNotFound { .. }
      | Self::AuthorizationNotFound(_) => ErrorKind::NotFound,
      Self::Unauthorized { .. } => ErrorKind::Unauthorized,
      Self::AlreadyResolved(_)
      | Self::AgencyNotActive(_)
      | Self::AgencyExpired(_)
      | Self::AlreadyFinished(_)
      | Self::EndBeforeStart => ErrorKind::InvalidTransition,
      Self::RateLimited { .. } => ErrorKind::RateLimited,
      Self::DuplicateNumber { .. }
      | Self::EmailTaken(_)
      | Self::ConflictingState(_) => ErrorKind::Conflict,
      Self::IncompleteFinishData | Self::Validation(_) => {
        ErrorKind::ValidationFailed
      }
      Self::Internal(_) => ErrorKind::Internal,
    }
  }

  /// Wrap a backend failure.
  pub fn internal<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
