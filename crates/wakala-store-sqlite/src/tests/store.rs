//! Direct `WorkflowStore` behaviour: actors, roles, authorizations, guarded
//! commits and the token denylist.

use chrono::{Duration, Utc};
use uuid::Uuid;
use wakala_core::{
  actor::{ActorKind, ActorRef, NewActor, RoleName},
  agency::{Agency, AgencyStatus},
  authorization::Authorization,
  notification::Notification,
  store::{AgencyCommit, CommitOutcome, CreateActorOutcome, InsertAgencyOutcome, WorkflowStore},
};

use super::{Cast, actor, approve, ctx, store};

// ─── Actors and roles ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_actor_attaches_role() {
  let s = store().await;
  let lawyer = actor(&s, ActorKind::Lawyer, RoleName::Lawyer, "Huda").await;

  let fetched = s.get_actor(lawyer.actor_ref()).await.unwrap().unwrap();
  assert_eq!(fetched.email, "huda@example.com");
  assert!(fetched.has_role(RoleName::Lawyer));
  assert_eq!(s.count_rows("roles").await.unwrap(), 1);
}

#[tokio::test]
async fn get_actor_respects_kind() {
  let s = store().await;
  let user = actor(&s, ActorKind::User, RoleName::User, "Omar").await;

  let wrong_kind = s
    .get_actor(ActorRef::new(ActorKind::Lawyer, user.id))
    .await
    .unwrap();
  assert!(wrong_kind.is_none());
}

#[tokio::test]
async fn duplicate_email_is_per_kind() {
  let s = store().await;
  actor(&s, ActorKind::User, RoleName::User, "Omar").await;

  let same_kind = s
    .create_actor(NewActor {
      kind:          ActorKind::User,
      name:          "Other Omar".into(),
      email:         "omar@example.com".into(),
      password_hash: "x".into(),
      role:          RoleName::User,
    })
    .await
    .unwrap();
  assert!(matches!(same_kind, CreateActorOutcome::EmailTaken));
  assert_eq!(s.count_rows("roles").await.unwrap(), 1);

  // The lawyer store is independent.
  actor(&s, ActorKind::Lawyer, RoleName::Lawyer, "Omar").await;
  assert_eq!(s.count_rows("actors").await.unwrap(), 2);
}

#[tokio::test]
async fn find_actor_by_email() {
  let s = store().await;
  let rep = actor(&s, ActorKind::Representative, RoleName::Representative, "Sami").await;

  let found = s
    .find_actor_by_email(ActorKind::Representative, "sami@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.id, rep.id);

  let missing = s
    .find_actor_by_email(ActorKind::User, "sami@example.com")
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn set_role_replaces_the_single_role() {
  let s = store().await;
  let user = actor(&s, ActorKind::User, RoleName::User, "Omar").await;

  assert!(s.set_role(user.actor_ref(), RoleName::Employee).await.unwrap());
  let fetched = s.get_actor(user.actor_ref()).await.unwrap().unwrap();
  assert!(fetched.has_role(RoleName::Employee));
  assert!(!fetched.has_role(RoleName::User));
  assert_eq!(s.count_rows("roles").await.unwrap(), 1);

  let ghost = ActorRef::new(ActorKind::User, Uuid::new_v4());
  assert!(!s.set_role(ghost, RoleName::Admin).await.unwrap());
}

#[tokio::test]
async fn delete_actor_cascades_to_role() {
  let s = store().await;
  let user = actor(&s, ActorKind::User, RoleName::User, "Omar").await;
  actor(&s, ActorKind::Lawyer, RoleName::Lawyer, "Huda").await;

  assert!(s.delete_actor(user.actor_ref()).await.unwrap());
  assert!(s.get_actor(user.actor_ref()).await.unwrap().is_none());
  assert_eq!(s.count_rows("roles").await.unwrap(), 1);

  assert!(!s.delete_actor(user.actor_ref()).await.unwrap());
}

// ─── Authorizations ──────────────────────────────────────────────────────────

#[tokio::test]
async fn get_authorizations_returns_existing_subset() {
  let s = store().await;
  let sell = s
    .add_authorization(Authorization::new("sell property".into()))
    .await
    .unwrap();
  let sue = s
    .add_authorization(Authorization::new("represent in court".into()))
    .await
    .unwrap();

  let found = s
    .get_authorizations(&[sell.id, Uuid::new_v4()])
    .await
    .unwrap();
  assert_eq!(found, vec![sell.clone()]);

  let all = s.list_authorizations().await.unwrap();
  let names: Vec<_> = all.iter().map(|a| a.name.as_str()).collect();
  assert_eq!(names, ["represent in court", "sell property"]);
  assert!(all.contains(&sue));
}

// ─── Agencies ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_agency_counts_per_user_lawyer_and_day() {
  let s = store().await;
  let user = actor(&s, ActorKind::User, RoleName::User, "Omar").await;
  let lawyer = actor(&s, ActorKind::Lawyer, RoleName::Lawyer, "Huda").await;

  for _ in 0..2 {
    let outcome = s
      .insert_agency(Agency::new(user.id, lawyer.id, "lease".into()), Vec::new(), 2)
      .await
      .unwrap();
    assert!(matches!(outcome, InsertAgencyOutcome::Inserted(_)));
  }

  let third = s
    .insert_agency(Agency::new(user.id, lawyer.id, "lease".into()), Vec::new(), 2)
    .await
    .unwrap();
  assert!(matches!(third, InsertAgencyOutcome::RateLimited { count: 2 }));
  assert_eq!(s.count_rows("agencies").await.unwrap(), 2);
}

#[tokio::test]
async fn stale_commit_is_refused() {
  let cast = Cast::new().await;
  let agency = cast.request().await;

  let mut first = agency.clone();
  first.cause = "ignored".into();
  first.exceptions = Some("first writer".into());
  let outcome = cast
    .store
    .commit_agency(AgencyCommit {
      agency:           first,
      expected_version: agency.version,
      notifications:    Vec::new(),
    })
    .await
    .unwrap();
  assert!(matches!(outcome, CommitOutcome::Committed(ref a) if a.version == agency.version + 1));

  let mut second = agency.clone();
  second.exceptions = Some("second writer".into());
  let outcome = cast
    .store
    .commit_agency(AgencyCommit {
      agency:           second,
      expected_version: agency.version,
      notifications:    Vec::new(),
    })
    .await
    .unwrap();
  assert!(matches!(outcome, CommitOutcome::Stale));

  let stored = cast.store.get_agency(agency.id).await.unwrap().unwrap();
  assert_eq!(stored.exceptions.as_deref(), Some("first writer"));
  assert_eq!(stored.cause, "rent dispute");
}

#[tokio::test]
async fn approval_numbers_cannot_be_rewritten() {
  let cast = Cast::new().await;
  let agency = cast.approved("10000001", "20000001").await;

  let mut tampered = agency.clone();
  tampered.sequential_number = Some("99999999".into());
  let result = cast
    .store
    .commit_agency(AgencyCommit {
      agency:           tampered,
      expected_version: agency.version,
      notifications:    Vec::new(),
    })
    .await;
  assert!(result.is_err(), "trigger must reject renumbering");

  let stored = cast.store.get_agency(agency.id).await.unwrap().unwrap();
  assert_eq!(stored.sequential_number.as_deref(), Some("10000001"));
}

#[tokio::test]
async fn status_cannot_move_back_to_pending() {
  let cast = Cast::new().await;
  let agency = cast.approved("10000001", "20000001").await;

  let mut reverted = agency.clone();
  reverted.status = AgencyStatus::Pending;
  reverted.is_active = false;
  let result = cast
    .store
    .commit_agency(AgencyCommit {
      agency:           reverted,
      expected_version: agency.version,
      notifications:    Vec::new(),
    })
    .await;
  assert!(result.is_err());
}

#[tokio::test]
async fn failed_commit_leaves_no_notifications() {
  let cast = Cast::new().await;
  let first = cast.approved("10000001", "20000001").await;
  let before = cast.store.count_rows("notifications").await.unwrap();

  let second = cast.forwarded().await;
  let after_forward = cast.store.count_rows("notifications").await.unwrap();
  let err = cast
    .workflow
    .resolve_agency(&ctx(&cast.rep), second.id, approve("10000001", "20000002"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), wakala_core::ErrorKind::Conflict);

  // Request + forward notifications for the second agency only.
  assert_eq!(after_forward, before + 2);
  assert_eq!(
    cast.store.count_rows("notifications").await.unwrap(),
    after_forward
  );
  let stored = cast.store.get_agency(second.id).await.unwrap().unwrap();
  assert_eq!(stored.status, AgencyStatus::Pending);
  assert!(first.is_active);
}

#[tokio::test]
async fn notification_failure_rolls_back_the_agency_update() {
  let cast = Cast::new().await;
  let agency = cast.forwarded().await;
  let before = cast.store.count_rows("notifications").await.unwrap();

  // Two notifications sharing one id: the second insert fails after the
  // agency row has already been updated inside the transaction.
  let mut note = cast
    .store
    .notifications_for(cast.rep.actor_ref())
    .await
    .unwrap()
    .remove(0);
  note.id = Uuid::new_v4();
  let mut edited = agency.clone();
  edited.exceptions = Some("no sale of property".into());
  let result = cast
    .store
    .commit_agency(AgencyCommit {
      agency:           edited,
      expected_version: agency.version,
      notifications:    vec![note.clone(), note],
    })
    .await;
  assert!(result.is_err());

  let stored = cast.store.get_agency(agency.id).await.unwrap().unwrap();
  assert_eq!(stored.version, agency.version);
  assert_eq!(stored.exceptions, agency.exceptions);
  assert_eq!(cast.store.count_rows("notifications").await.unwrap(), before);
}

#[tokio::test]
async fn rejected_renumbering_writes_no_notifications() {
  let cast = Cast::new().await;
  let agency = cast.approved("10000001", "20000001").await;
  let before = cast.store.count_rows("notifications").await.unwrap();

  let note = cast
    .store
    .notifications_for(cast.user.actor_ref())
    .await
    .unwrap()
    .remove(0);
  let mut tampered = agency.clone();
  tampered.record_number = Some("99999999".into());
  let result = cast
    .store
    .commit_agency(AgencyCommit {
      agency:           tampered,
      expected_version: agency.version,
      notifications:    vec![Notification { id: Uuid::new_v4(), ..note }],
    })
    .await;
  assert!(result.is_err());

  assert_eq!(cast.store.count_rows("notifications").await.unwrap(), before);
  let stored = cast.store.get_agency(agency.id).await.unwrap().unwrap();
  assert_eq!(stored.record_number.as_deref(), Some("20000001"));
}

// ─── Token denylist ──────────────────────────────────────────────────────────

#[tokio::test]
async fn revoked_tokens_are_remembered() {
  let s = store().await;
  let jti = Uuid::new_v4();
  assert!(!s.is_token_revoked(jti).await.unwrap());

  assert!(s.revoke_token(jti, Utc::now() + Duration::hours(1)).await.unwrap());
  assert!(s.is_token_revoked(jti).await.unwrap());

  // The second revocation reports that nothing changed.
  assert!(!s.revoke_token(jti, Utc::now() + Duration::hours(1)).await.unwrap());
  assert_eq!(s.count_rows("revoked_tokens").await.unwrap(), 1);
}

#[tokio::test]
async fn expired_denylist_entries_are_purged() {
  let s = store().await;
  let old = Uuid::new_v4();
  s.revoke_token(old, Utc::now() - Duration::minutes(5)).await.unwrap();
  s.revoke_token(Uuid::new_v4(), Utc::now() + Duration::hours(1))
    .await
    .unwrap();

  assert!(!s.is_token_revoked(old).await.unwrap());
  assert_eq!(s.count_rows("revoked_tokens").await.unwrap(), 1);
}
