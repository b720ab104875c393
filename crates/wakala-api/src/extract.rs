//! Bearer-token extractor.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use wakala_auth::Session;
use wakala_core::{actor::ActorContext, store::WorkflowStore};

use crate::{AppState, error::ApiError};

/// Present in a handler means the request carried a live access token.
pub struct Authenticated {
  pub session: Session,
  /// The raw token, kept for sign-out.
  pub token:   String,
}

impl Authenticated {
  pub fn ctx(&self) -> &ActorContext { &self.session.ctx }
}

/// Pull the token out of an `Authorization: Bearer …` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .ok_or(ApiError::MissingToken)
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: WorkflowStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?.to_owned();
    let session = state.auth.verify_access(&token).await?;
    Ok(Authenticated { session, token })
  }
}
