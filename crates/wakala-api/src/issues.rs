//! Handlers for issues. All of them act for the signed-in lawyer.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/issues` | The lawyer's issues |
//! | `GET`    | `/agencies/{id}/issues` | Limited to one agency |
//! | `POST`   | `/agencies/{id}/issues` | Open an issue under an agency in force |
//! | `GET`    | `/issues/{id}` | |
//! | `DELETE` | `/issues/{id}` | |
//! | `POST`   | `/issues/{id}/status` | Body: `{"status": …}` |
//! | `POST`   | `/issues/{id}/finish` | Body: `{"end_date": …, "success_rate": …}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use wakala_core::{
  issue::{FinishIssue, Issue, NewIssue},
  store::WorkflowStore,
};

use crate::{AppState, error::Result, extract::Authenticated};

/// `GET /issues`
pub async fn list<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
) -> Result<Json<Vec<Issue>>> {
  Ok(Json(state.workflow.issues(auth.ctx(), None).await?))
}

/// `GET /agencies/{id}/issues`
pub async fn list_for_agency<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(agency_id): Path<Uuid>,
) -> Result<Json<Vec<Issue>>> {
  Ok(Json(state.workflow.issues(auth.ctx(), Some(agency_id)).await?))
}

/// `POST /agencies/{id}/issues`
pub async fn create<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(agency_id): Path<Uuid>,
  Json(body): Json<NewIssue>,
) -> Result<impl IntoResponse> {
  let issue = state
    .workflow
    .create_issue(auth.ctx(), agency_id, body)
    .await?;
  Ok((StatusCode::CREATED, Json(issue)))
}

/// `GET /issues/{id}`
pub async fn get_one<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Issue>> {
  Ok(Json(state.workflow.issue(auth.ctx(), id).await?))
}

/// `DELETE /issues/{id}`
pub async fn delete<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<StatusCode> {
  state.workflow.delete_issue(auth.ctx(), id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: String,
}

/// `POST /issues/{id}/status`
pub async fn change_status<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Issue>> {
  Ok(Json(
    state
      .workflow
      .change_issue_status(auth.ctx(), id, &body.status)
      .await?,
  ))
}

/// `POST /issues/{id}/finish`
pub async fn finish<S: WorkflowStore + 'static>(
  State(state): State<AppState<S>>,
  auth: Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<FinishIssue>,
) -> Result<Json<Issue>> {
  Ok(Json(state.workflow.finish_issue(auth.ctx(), id, body).await?))
}
