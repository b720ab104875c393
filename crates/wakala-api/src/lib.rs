//! JSON REST API for Wakala.
//!
//! Exposes an axum [`Router`] backed by any [`WorkflowStore`]. Every route
//! except sign-in, registration and refresh requires a bearer access token.
//! TLS and request tracing are the caller's responsibility.

pub mod admin;
pub mod agencies;
pub mod auth;
pub mod error;
pub mod extract;
pub mod issues;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use wakala_auth::{AuthConfig, AuthGateway};
use wakala_core::{Workflow, WorkflowConfig, store::WorkflowStore};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `WAKALA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "defaults::host")]
  pub host:                   String,
  #[serde(default = "defaults::port")]
  pub port:                   u16,
  #[serde(default = "defaults::store_path")]
  pub store_path:             PathBuf,
  pub jwt_secret:             String,
  #[serde(default = "defaults::jwt_issuer")]
  pub jwt_issuer:             String,
  #[serde(default = "defaults::access_token_ttl_secs")]
  pub access_token_ttl_secs:  u64,
  #[serde(default = "defaults::refresh_token_ttl_secs")]
  pub refresh_token_ttl_secs: u64,
  #[serde(default = "defaults::daily_agency_limit")]
  pub daily_agency_limit:     u32,
}

mod defaults {
  use std::path::PathBuf;

  pub fn host() -> String { "127.0.0.1".into() }
  pub fn port() -> u16 { 8080 }
  pub fn store_path() -> PathBuf { PathBuf::from("~/.local/share/wakala/wakala.db") }
  pub fn jwt_issuer() -> String { "wakala".into() }
  pub fn access_token_ttl_secs() -> u64 { 3600 }
  pub fn refresh_token_ttl_secs() -> u64 { 1_209_600 }
  pub fn daily_agency_limit() -> u32 { 3 }
}

impl ServerConfig {
  pub fn auth_config(&self) -> AuthConfig {
    AuthConfig {
      jwt_secret: self.jwt_secret.clone(),
      jwt_issuer: self.jwt_issuer.clone(),
      access_token_ttl_secs: self.access_token_ttl_secs,
      refresh_token_ttl_secs: self.refresh_token_ttl_secs,
      ..AuthConfig::default()
    }
  }

  pub fn workflow_config(&self) -> WorkflowConfig {
    WorkflowConfig { daily_agency_limit: self.daily_agency_limit }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub workflow: Workflow<S>,
  pub auth:     AuthGateway<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      workflow: self.workflow.clone(),
      auth:     self.auth.clone(),
    }
  }
}

impl<S: WorkflowStore> AppState<S> {
  pub fn new(store: Arc<S>, config: &ServerConfig) -> Self {
    Self {
      workflow: Workflow::new(Arc::clone(&store), config.workflow_config()),
      auth:     AuthGateway::new(store, config.auth_config()),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: WorkflowStore + 'static,
{
  Router::new()
    // Authentication
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/refresh", post(auth::refresh::<S>))
    .route("/auth/{guard}/login", post(auth::guard_login::<S>))
    .route("/auth/{guard}/register", post(auth::register::<S>))
    .route("/auth/{guard}/signout", post(auth::signout::<S>))
    .route("/me", get(auth::me::<S>))
    // Agencies
    .route("/agencies", get(agencies::list::<S>).post(agencies::create::<S>))
    .route("/agencies/{id}", get(agencies::get_one::<S>))
    .route("/agencies/{id}/forward", post(agencies::forward::<S>))
    .route("/agencies/{id}/resolve", post(agencies::resolve::<S>))
    .route("/agencies/{id}/isolate", post(agencies::isolate::<S>))
    .route(
      "/agencies/{id}/issues",
      get(issues::list_for_agency::<S>).post(issues::create::<S>),
    )
    // Issues
    .route("/issues", get(issues::list::<S>))
    .route("/issues/{id}", get(issues::get_one::<S>).delete(issues::delete::<S>))
    .route("/issues/{id}/status", post(issues::change_status::<S>))
    .route("/issues/{id}/finish", post(issues::finish::<S>))
    // Notifications and catalog
    .route("/notifications", get(agencies::notifications::<S>))
    .route(
      "/authorizations",
      get(admin::list_authorizations::<S>).post(admin::add_authorization::<S>),
    )
    // Staff management
    .route("/admin/staff", post(admin::create_staff::<S>))
    .route(
      "/admin/actors/{kind}/{id}",
      axum::routing::delete(admin::delete_actor::<S>),
    )
    .route("/admin/actors/{kind}/{id}/role", put(admin::set_role::<S>))
    .with_state(state)
}
