//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure renders as `{"error": <kind>, "message": <text>}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use wakala_auth::AuthError;
use wakala_core::ErrorKind;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Workflow(#[from] wakala_core::Error),

  #[error(transparent)]
  Auth(#[from] AuthError),

  #[error("missing bearer token")]
  MissingToken,
}

impl ApiError {
  fn status_and_kind(&self) -> (StatusCode, &'static str) {
    match self {
      ApiError::Workflow(e) => {
        let kind = e.kind();
        let status = match kind {
          ErrorKind::NotFound => StatusCode::NOT_FOUND,
          ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
          ErrorKind::InvalidTransition => StatusCode::BAD_REQUEST,
          ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
          ErrorKind::Conflict => StatusCode::CONFLICT,
          ErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
          ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, kind.into())
      }
      ApiError::Auth(e) => match e {
        AuthError::InvalidCredentials
        | AuthError::NotAuthenticated
        | AuthError::TokenExpired
        | AuthError::TokenInvalid(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
        AuthError::RoleMismatch(_)
        | AuthError::Forbidden { .. }
        | AuthError::RegistrationClosed(_) => (StatusCode::FORBIDDEN, "unauthorized"),
        AuthError::EmailTaken(_) => (StatusCode::CONFLICT, "conflict"),
        AuthError::ActorNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        AuthError::InvalidRole { .. } | AuthError::Validation(_) => {
          (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed")
        }
        AuthError::Crypto(_) | AuthError::Store(_) => {
          (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
      },
      ApiError::MissingToken => (StatusCode::UNAUTHORIZED, "unauthenticated"),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind) = self.status_and_kind();
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!(error = %self, "request failed");
      "internal error".to_owned()
    } else {
      self.to_string()
    };
    (status, Json(json!({ "error": kind, "message": message }))).into_response()
  }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;
