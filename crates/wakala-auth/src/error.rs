//! Authentication error types.

use thiserror::Error;
use uuid::Uuid;
use wakala_core::actor::{ActorKind, RoleName};

use crate::guard::Guard;

#[derive(Debug, Error)]
pub enum AuthError {
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("account cannot sign in through the {0} guard")]
  RoleMismatch(Guard),

  #[error("not authenticated")]
  NotAuthenticated,

  #[error("token has expired")]
  TokenExpired,

  #[error("invalid token: {0}")]
  TokenInvalid(String),

  #[error("email {0:?} is already registered")]
  EmailTaken(String),

  #[error("the {0} guard does not accept registrations")]
  RegistrationClosed(Guard),

  #[error("role {required} is required for this action")]
  Forbidden { required: RoleName },

  #[error("{kind} not found: {id}")]
  ActorNotFound { kind: ActorKind, id: Uuid },

  #[error("role {role} cannot be given to a {kind}")]
  InvalidRole { role: RoleName, kind: ActorKind },

  #[error("invalid input: {0}")]
  Validation(String),

  #[error("cryptography error: {0}")]
  Crypto(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
  pub(crate) fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = AuthError> = std::result::Result<T, E>;
