//! Handlers for sign-in, registration, refresh and sign-out.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | Guard picked from the email |
//! | `POST` | `/auth/refresh` | Body: `{"refresh_token": …}` |
//! | `POST` | `/auth/{guard}/login` | `user`, `employee`, `admin`, `lawyer`, `representative` |
//! | `POST` | `/auth/{guard}/register` | Not open for `employee` or `admin` |
//! | `POST` | `/auth/{guard}/signout` | Revokes the presented access token |
//! | `GET`  | `/me` | The signed-in account |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use wakala_auth::{Guard, Registration, TokenPair};
use wakala_core::{actor::Actor, store::WorkflowStore};

use crate::{AppState, error::Result, extract::Authenticated};

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignedIn {
  pub guard:  Guard,
  #[serde(flatten)]
  pub tokens: TokenPair,
}

#[derive(Debug, Serialize)]
pub struct Registered {
  pub actor:  Actor,
  #[serde(flatten)]
  pub tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
pub struct RefreshBody {
  pub refresh_token: String,
}

/// `POST /auth/login`
pub async fn login<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  Json(body): Json<Credentials>,
) -> Result<Json<SignedIn>> {
  let (guard, tokens) = state.auth.login(&body.email, &body.password).await?;
  Ok(Json(SignedIn { guard, tokens }))
}

/// `POST /auth/{guard}/login`
pub async fn guard_login<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  Path(guard): Path<Guard>,
  Json(body): Json<Credentials>,
) -> Result<Json<SignedIn>> {
  let tokens = state
    .auth
    .authenticate(guard, &body.email, &body.password)
    .await?;
  Ok(Json(SignedIn { guard, tokens }))
}

/// `POST /auth/{guard}/register`
pub async fn register<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  Path(guard): Path<Guard>,
  Json(body): Json<Registration>,
) -> Result<impl IntoResponse> {
  let (actor, tokens) = state.auth.register(guard, body).await?;
  Ok((StatusCode::CREATED, Json(Registered { actor, tokens })))
}

/// `POST /auth/refresh`
pub async fn refresh<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  Json(body): Json<RefreshBody>,
) -> Result<Json<TokenPair>> {
  Ok(Json(state.auth.refresh(&body.refresh_token).await?))
}

/// `POST /auth/{guard}/signout`
pub async fn signout<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  Path(guard): Path<Guard>,
  auth: Authenticated,
) -> Result<StatusCode> {
  state.auth.signout(guard, &auth.token).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /me`
pub async fn me<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
) -> Result<Json<Actor>> {
  Ok(Json(state.auth.profile(auth.ctx()).await?))
}
