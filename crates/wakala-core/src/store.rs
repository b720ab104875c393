//! The `WorkflowStore` trait and the outcome types its writes report.
//!
//! The trait is implemented by storage backends (e.g. `wakala-store-sqlite`).
//! The workflow engines and the auth gateway depend on this abstraction, not
//! on any concrete backend.
//!
//! Every write method is atomic: either all of its effects persist (for
//! example an agency update *and* its notifications) or none do. Outcomes that
//! carry domain meaning, such as a hit rate limit or a stale version, come back
//! as values rather than as `Self::Error`, which is reserved for backend
//! failures.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  actor::{Actor, ActorKind, ActorRef, NewActor, RoleName},
  agency::{Agency, AgencyQuery},
  authorization::Authorization,
  issue::Issue,
  notification::Notification,
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CreateActorOutcome {
  Created(Actor),
  EmailTaken,
}

#[derive(Debug)]
pub enum InsertAgencyOutcome {
  Inserted(Agency),
  /// The `(user, lawyer, day)` bucket already holds `count` requests.
  RateLimited { count: u32 },
}

/// A full replacement of an agency row guarded by its version.
#[derive(Debug, Clone)]
pub struct AgencyCommit {
  pub agency:           Agency,
  pub expected_version: i64,
  /// Persisted in the same transaction as the agency row.
  pub notifications:    Vec<Notification>,
}

#[derive(Debug)]
pub enum CommitOutcome<T> {
  /// The row was written; carries the stored value with its new version.
  Committed(T),
  /// Another writer got there first.
  Stale,
  /// A unique number is already held by another row.
  Duplicate { field: &'static str },
  /// An issue write found its parent agency out of force.
  AgencyInactive { agency_id: Uuid },
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the persistence backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WorkflowStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Actors ────────────────────────────────────────────────────────────

  /// Create an actor and its role record in one transaction.
  fn create_actor(
    &self,
    input: NewActor,
  ) -> impl Future<Output = Result<CreateActorOutcome, Self::Error>> + Send + '_;

  fn get_actor(
    &self,
    actor: ActorRef,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + '_;

  fn find_actor_by_email<'a>(
    &'a self,
    kind: ActorKind,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Actor>, Self::Error>> + Send + 'a;

  /// Replace an actor's role. Returns `false` if the actor does not exist.
  fn set_role(
    &self,
    actor: ActorRef,
    role: RoleName,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete an actor together with its role. Returns `false` if absent.
  fn delete_actor(
    &self,
    actor: ActorRef,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Authorizations ────────────────────────────────────────────────────

  fn add_authorization(
    &self,
    authorization: Authorization,
  ) -> impl Future<Output = Result<Authorization, Self::Error>> + Send + '_;

  fn list_authorizations(
    &self,
  ) -> impl Future<Output = Result<Vec<Authorization>, Self::Error>> + Send + '_;

  /// Return the subset of `ids` that exist.
  fn get_authorizations<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Authorization>, Self::Error>> + Send + 'a;

  // ── Agencies ──────────────────────────────────────────────────────────

  /// Insert a new agency with its notifications unless the requesting user
  /// already has `daily_limit` requests to the same lawyer on the agency's
  /// creation day. The count and the insert are serialized per store.
  fn insert_agency(
    &self,
    agency: Agency,
    notifications: Vec<Notification>,
    daily_limit: u32,
  ) -> impl Future<Output = Result<InsertAgencyOutcome, Self::Error>> + Send + '_;

  fn get_agency(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Agency>, Self::Error>> + Send + '_;

  fn list_agencies<'a>(
    &'a self,
    query: &'a AgencyQuery,
  ) -> impl Future<Output = Result<Vec<Agency>, Self::Error>> + Send + 'a;

  /// Write `commit.agency` if the stored version still equals
  /// `commit.expected_version`, checking sequential/record number uniqueness
  /// in the same transaction.
  fn commit_agency(
    &self,
    commit: AgencyCommit,
  ) -> impl Future<Output = Result<CommitOutcome<Agency>, Self::Error>> + Send + '_;

  // ── Issues ────────────────────────────────────────────────────────────

  /// Insert an issue if its agency is approved and active when the write
  /// runs. The agency check and the insert share one transaction.
  fn insert_issue(
    &self,
    issue: Issue,
  ) -> impl Future<Output = Result<CommitOutcome<Issue>, Self::Error>> + Send + '_;

  fn get_issue(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Issue>, Self::Error>> + Send + '_;

  fn list_issues(
    &self,
    lawyer_id: Uuid,
    agency_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Issue>, Self::Error>> + Send + '_;

  /// Version-guarded replacement of an issue row. With `agency_in_force`
  /// set, the parent agency must also be approved and active at write time.
  fn update_issue(
    &self,
    issue: Issue,
    expected_version: i64,
    agency_in_force: bool,
  ) -> impl Future<Output = Result<CommitOutcome<Issue>, Self::Error>> + Send + '_;

  /// Delete `issue` if its row still has `issue.version` and its agency is
  /// approved and active at write time.
  fn delete_issue<'a>(
    &'a self,
    issue: &'a Issue,
  ) -> impl Future<Output = Result<CommitOutcome<()>, Self::Error>> + Send + 'a;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Notifications addressed to `recipient`, newest first.
  fn notifications_for(
    &self,
    recipient: ActorRef,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  // ── Token denylist ────────────────────────────────────────────────────

  /// Record a token id as revoked until `expires_at`. Returns `false` if it
  /// was already revoked.
  fn revoke_token(
    &self,
    jti: Uuid,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn is_token_revoked(
    &self,
    jti: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
