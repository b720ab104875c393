//! Staff endpoints: the authorization catalog and account management.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/authorizations` | Any signed-in actor |
//! | `POST`   | `/authorizations` | Employee or admin. Body: `{"name": …}` |
//! | `POST`   | `/admin/staff` | Admin. Body: `{"role", "name", "email", "password"}` |
//! | `PUT`    | `/admin/actors/{kind}/{id}/role` | Admin. Body: `{"role": …}` |
//! | `DELETE` | `/admin/actors/{kind}/{id}` | Admin |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use wakala_auth::Registration;
use wakala_core::{
  actor::{Actor, ActorKind, ActorRef, RoleName},
  authorization::Authorization,
  store::WorkflowStore,
};

use crate::{AppState, error::Result, extract::Authenticated};

// ─── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuthorizationBody {
  pub name: String,
}

/// `GET /authorizations`
pub async fn list_authorizations<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Json<Vec<Authorization>>> {
  Ok(Json(state.workflow.authorizations().await?))
}

/// `POST /authorizations`
pub async fn add_authorization<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Json(body): Json<AuthorizationBody>,
) -> Result<impl IntoResponse> {
  let authorization = state
    .workflow
    .add_authorization(auth.ctx(), &body.name)
    .await?;
  Ok((StatusCode::CREATED, Json(authorization)))
}

// ─── Accounts ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StaffBody {
  pub role:    RoleName,
  #[serde(flatten)]
  pub account: Registration,
}

/// `POST /admin/staff`
pub async fn create_staff<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Json(body): Json<StaffBody>,
) -> Result<impl IntoResponse> {
  let actor = state
    .auth
    .create_staff(auth.ctx(), body.role, body.account)
    .await?;
  Ok((StatusCode::CREATED, Json(actor)))
}

#[derive(Debug, Deserialize)]
pub struct RoleBody {
  pub role: RoleName,
}

/// `PUT /admin/actors/{kind}/{id}/role`
pub async fn set_role<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path((kind, id)): Path<(ActorKind, Uuid)>,
  Json(body): Json<RoleBody>,
) -> Result<Json<Actor>> {
  let actor = state
    .auth
    .set_role(auth.ctx(), ActorRef::new(kind, id), body.role)
    .await?;
  Ok(Json(actor))
}

/// `DELETE /admin/actors/{kind}/{id}`
pub async fn delete_actor<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path((kind, id)): Path<(ActorKind, Uuid)>,
) -> Result<StatusCode> {
  state
    .auth
    .delete_actor(auth.ctx(), ActorRef::new(kind, id))
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
