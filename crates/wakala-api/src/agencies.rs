//! Handlers for `/agencies` and `/notifications`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/agencies` | Scoped to the caller; optional `?status=` |
//! | `POST` | `/agencies` | Body: `{"lawyer_id": …, "cause": …}` |
//! | `GET`  | `/agencies/{id}` | Participants and staff only |
//! | `POST` | `/agencies/{id}/forward` | Lawyer |
//! | `POST` | `/agencies/{id}/resolve` | Representative |
//! | `POST` | `/agencies/{id}/isolate` | Owning user |
//! | `GET`  | `/notifications` | Newest first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use wakala_core::{
  agency::{Agency, AgencyStatus, ForwardAgency, ResolveAgency},
  notification::Notification,
  store::WorkflowStore,
};

use crate::{AppState, error::Result, extract::Authenticated};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<AgencyStatus>,
}

/// `GET /agencies[?status=<status>]`
pub async fn list<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Agency>>> {
  Ok(Json(state.workflow.agencies(auth.ctx(), params.status).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub lawyer_id: Uuid,
  pub cause:     String,
}

/// `POST /agencies`
pub async fn create<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse> {
  let agency = state
    .workflow
    .create_agency(auth.ctx(), body.lawyer_id, &body.cause)
    .await?;
  Ok((StatusCode::CREATED, Json(agency)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /agencies/{id}`
pub async fn get_one<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Agency>> {
  Ok(Json(state.workflow.agency(auth.ctx(), id).await?))
}

// ─── Transitions ──────────────────────────────────────────────────────────────

/// `POST /agencies/{id}/forward`
pub async fn forward<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<ForwardAgency>,
) -> Result<Json<Agency>> {
  Ok(Json(state.workflow.forward_agency(auth.ctx(), id, body).await?))
}

/// `POST /agencies/{id}/resolve`
pub async fn resolve<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<ResolveAgency>,
) -> Result<Json<Agency>> {
  Ok(Json(state.workflow.resolve_agency(auth.ctx(), id, body).await?))
}

/// `POST /agencies/{id}/isolate`
pub async fn isolate<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Agency>> {
  Ok(Json(state.workflow.isolate_agency(auth.ctx(), id).await?))
}

// ─── Notifications ────────────────────────────────────────────────────────────

/// `GET /notifications`
pub async fn notifications<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
) -> Result<Json<Vec<Notification>>> {
  Ok(Json(state.workflow.notifications(auth.ctx()).await?))
}
