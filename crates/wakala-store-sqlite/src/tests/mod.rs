//! Integration tests for `SqliteStore` and the workflow engines running on
//! top of it, against an in-memory database.

mod store;

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;
use wakala_core::{
  Workflow, WorkflowConfig,
  actor::{Actor, ActorContext, ActorKind, NewActor, RoleName},
  agency::{Agency, AgencyStatus, AgencyType, ForwardAgency, ResolveAgency},
  issue::NewIssue,
  store::{CreateActorOutcome, WorkflowStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn actor(s: &SqliteStore, kind: ActorKind, role: RoleName, name: &str) -> Actor {
  let outcome = s
    .create_actor(NewActor {
      kind,
      name: name.into(),
      email: format!("{}@example.com", name.to_lowercase()),
      password_hash: "$argon2id$placeholder".into(),
      role,
    })
    .await
    .unwrap();
  match outcome {
    CreateActorOutcome::Created(a) => a,
    CreateActorOutcome::EmailTaken => panic!("email taken for {name}"),
  }
}

fn ctx(a: &Actor) -> ActorContext { ActorContext::from(a) }

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A workflow over a fresh store with one actor of each kind.
struct Cast {
  store:    Arc<SqliteStore>,
  workflow: Workflow<SqliteStore>,
  user:     Actor,
  lawyer:   Actor,
  rep:      Actor,
  admin:    Actor,
}

impl Cast {
  async fn new() -> Self {
    let s = store().await;
    let user = actor(&s, ActorKind::User, RoleName::User, "Omar").await;
    let lawyer = actor(&s, ActorKind::Lawyer, RoleName::Lawyer, "Huda").await;
    let rep =
      actor(&s, ActorKind::Representative, RoleName::Representative, "Sami").await;
    let admin = actor(&s, ActorKind::User, RoleName::Admin, "Nour").await;

    let store = Arc::new(s);
    let workflow = Workflow::new(Arc::clone(&store), WorkflowConfig::default());
    Self { store, workflow, user, lawyer, rep, admin }
  }

  async fn request(&self) -> Agency {
    self
      .workflow
      .create_agency(&ctx(&self.user), self.lawyer.id, "rent dispute")
      .await
      .unwrap()
  }

  async fn forwarded(&self) -> Agency {
    let agency = self.request().await;
    self
      .workflow
      .forward_agency(&ctx(&self.lawyer), agency.id, forward_to(self.rep.id))
      .await
      .unwrap()
  }

  async fn approved(&self, sequential: &str, record: &str) -> Agency {
    let agency = self.forwarded().await;
    self
      .workflow
      .resolve_agency(&ctx(&self.rep), agency.id, approve(sequential, record))
      .await
      .unwrap()
  }
}

fn forward_to(representative_id: Uuid) -> ForwardAgency {
  ForwardAgency {
    representative_id,
    kind: AgencyType::Private,
    authorizations: Vec::new(),
    exceptions: None,
  }
}

fn approve(sequential: &str, record: &str) -> ResolveAgency {
  ResolveAgency {
    status:            AgencyStatus::Approved,
    sequential_number: Some(sequential.into()),
    record_number:     Some(record.into()),
    place_of_issue:    Some("Damascus".into()),
  }
}

fn reject() -> ResolveAgency {
  ResolveAgency {
    status:            AgencyStatus::Rejected,
    sequential_number: None,
    record_number:     None,
    place_of_issue:    None,
  }
}

fn new_issue(base: &str, record: &str, start: NaiveDate) -> NewIssue {
  NewIssue {
    base_number:    base.into(),
    record_number:  record.into(),
    court_name:     "First Instance Civil Court".into(),
    kind:           "civil".into(),
    start_date:     start,
    estimated_cost: 1500.0,
    status:         None,
  }
}
