//! Gateway behaviour against an in-memory `SqliteStore`.

use std::sync::Arc;

use wakala_core::{
  actor::{ActorContext, ActorKind, ActorRef, RoleName},
  store::WorkflowStore,
};
use wakala_store_sqlite::SqliteStore;

use crate::{AuthConfig, AuthError, AuthGateway, Guard, Registration};

const PASSWORD: &str = "s3cret-pass";

async fn gateway() -> AuthGateway<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let config = AuthConfig { jwt_secret: "test-secret".into(), ..AuthConfig::default() };
  AuthGateway::new(Arc::new(store), config)
}

fn registration(name: &str) -> Registration {
  Registration {
    name:     name.into(),
    email:    format!("{}@example.com", name.to_lowercase()),
    password: PASSWORD.into(),
  }
}

/// An admin account, bootstrapped by promoting a registered user.
async fn admin(gw: &AuthGateway<SqliteStore>) -> ActorContext {
  let (actor, _) = gw.register(Guard::User, registration("Nour")).await.unwrap();
  assert!(gw.store.set_role(actor.actor_ref(), RoleName::Admin).await.unwrap());
  let actor = gw.load_actor(ActorKind::User, actor.id).await.unwrap();
  ActorContext::from(&actor)
}

// ─── Sign-in ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_authenticate() {
  let gw = gateway().await;
  let (lawyer, pair) = gw.register(Guard::Lawyer, registration("Huda")).await.unwrap();
  assert!(lawyer.has_role(RoleName::Lawyer));

  let session = gw.verify_access(&pair.access_token).await.unwrap();
  assert_eq!(session.ctx.id, lawyer.id);
  assert_eq!(session.ctx.kind, ActorKind::Lawyer);
  assert_eq!(session.guard, Guard::Lawyer);

  gw.authenticate(Guard::Lawyer, "HUDA@example.com ", PASSWORD)
    .await
    .unwrap();
}

#[tokio::test]
async fn wrong_password_or_store_is_invalid_credentials() {
  let gw = gateway().await;
  gw.register(Guard::Lawyer, registration("Huda")).await.unwrap();

  assert!(matches!(
    gw.authenticate(Guard::Lawyer, "huda@example.com", "not-it").await,
    Err(AuthError::InvalidCredentials)
  ));
  assert!(matches!(
    gw.authenticate(Guard::Representative, "huda@example.com", PASSWORD).await,
    Err(AuthError::InvalidCredentials)
  ));
}

#[tokio::test]
async fn guards_reject_the_other_user_roles() {
  let gw = gateway().await;
  let root = admin(&gw).await;
  gw.register(Guard::User, registration("Omar")).await.unwrap();
  gw.create_staff(&root, RoleName::Employee, registration("Rana"))
    .await
    .unwrap();

  assert!(matches!(
    gw.authenticate(Guard::Admin, "omar@example.com", PASSWORD).await,
    Err(AuthError::RoleMismatch(Guard::Admin))
  ));
  assert!(matches!(
    gw.authenticate(Guard::User, "rana@example.com", PASSWORD).await,
    Err(AuthError::RoleMismatch(Guard::User))
  ));
  assert!(matches!(
    gw.authenticate(Guard::Admin, "rana@example.com", PASSWORD).await,
    Err(AuthError::RoleMismatch(Guard::Admin))
  ));
  assert!(matches!(
    gw.authenticate(Guard::Employee, "nour@example.com", PASSWORD).await,
    Err(AuthError::RoleMismatch(Guard::Employee))
  ));

  let pair = gw
    .authenticate(Guard::Employee, "rana@example.com", PASSWORD)
    .await
    .unwrap();
  assert_eq!(gw.verify_access(&pair.access_token).await.unwrap().guard, Guard::Employee);
  gw.authenticate(Guard::Admin, "nour@example.com", PASSWORD)
    .await
    .unwrap();
}

#[tokio::test]
async fn unified_login_searches_users_then_lawyers_then_representatives() {
  let gw = gateway().await;
  let root = admin(&gw).await;
  gw.create_staff(&root, RoleName::Employee, registration("Rana"))
    .await
    .unwrap();
  gw.register(Guard::User, registration("Omar")).await.unwrap();
  gw.register(Guard::Representative, registration("Sami")).await.unwrap();
  gw.register(Guard::Lawyer, registration("Sami")).await.unwrap();

  assert_eq!(gw.determine_guard("sami@example.com").await.unwrap(), Some(Guard::Lawyer));
  assert_eq!(gw.determine_guard("nour@example.com").await.unwrap(), Some(Guard::Admin));
  assert_eq!(gw.determine_guard("rana@example.com").await.unwrap(), Some(Guard::Employee));
  assert_eq!(gw.determine_guard("omar@example.com").await.unwrap(), Some(Guard::User));
  assert_eq!(gw.determine_guard("nobody@example.com").await.unwrap(), None);

  let (guard, pair) = gw.login("sami@example.com", PASSWORD).await.unwrap();
  assert_eq!(guard, Guard::Lawyer);
  let session = gw.verify_access(&pair.access_token).await.unwrap();
  assert_eq!(session.ctx.kind, ActorKind::Lawyer);

  let (guard, _) = gw.login("nour@example.com", PASSWORD).await.unwrap();
  assert_eq!(guard, Guard::Admin);
  let (guard, _) = gw.login("rana@example.com", PASSWORD).await.unwrap();
  assert_eq!(guard, Guard::Employee);

  assert!(matches!(
    gw.login("nobody@example.com", PASSWORD).await,
    Err(AuthError::InvalidCredentials)
  ));
}

#[tokio::test]
async fn unknown_email_and_wrong_password_look_alike() {
  let gw = gateway().await;
  gw.register(Guard::User, registration("Omar")).await.unwrap();

  for email in ["omar@example.com", "ghost@example.com"] {
    assert!(matches!(
      gw.authenticate(Guard::User, email, "not-the-password").await,
      Err(AuthError::InvalidCredentials)
    ));
  }
}

#[tokio::test]
async fn gateway_without_a_secret_issues_no_tokens() {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let gw = AuthGateway::new(Arc::new(store), AuthConfig::default());

  assert!(matches!(
    gw.register(Guard::User, registration("Omar")).await,
    Err(AuthError::Crypto(_))
  ));
  // Nothing was written before the secret was checked.
  assert!(
    gw.store
      .find_actor_by_email(ActorKind::User, "omar@example.com")
      .await
      .unwrap()
      .is_none()
  );
  assert!(matches!(
    gw.authenticate(Guard::User, "omar@example.com", PASSWORD).await,
    Err(AuthError::Crypto(_))
  ));
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn registration_rules() {
  let gw = gateway().await;
  gw.register(Guard::User, registration("Omar")).await.unwrap();

  assert!(matches!(
    gw.register(Guard::User, registration("Omar")).await,
    Err(AuthError::EmailTaken(_))
  ));
  assert!(matches!(
    gw.register(Guard::Admin, registration("Rana")).await,
    Err(AuthError::RegistrationClosed(Guard::Admin))
  ));
  assert!(matches!(
    gw.register(Guard::Employee, registration("Rana")).await,
    Err(AuthError::RegistrationClosed(Guard::Employee))
  ));

  let mut short = registration("Karim");
  short.password = "short".into();
  assert!(matches!(gw.register(Guard::User, short).await, Err(AuthError::Validation(_))));

  let mut bad_email = registration("Karim");
  bad_email.email = "karim".into();
  assert!(matches!(
    gw.register(Guard::User, bad_email).await,
    Err(AuthError::Validation(_))
  ));
}

// ─── Token lifecycle ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_tokens_work_once() {
  let gw = gateway().await;
  let (_, pair) = gw.register(Guard::User, registration("Omar")).await.unwrap();

  let next = gw.refresh(&pair.refresh_token).await.unwrap();
  gw.verify_access(&next.access_token).await.unwrap();

  assert!(matches!(
    gw.refresh(&pair.refresh_token).await,
    Err(AuthError::TokenInvalid(_))
  ));
  gw.refresh(&next.refresh_token).await.unwrap();
}

#[tokio::test]
async fn token_halves_cannot_swap_roles() {
  let gw = gateway().await;
  let (_, pair) = gw.register(Guard::User, registration("Omar")).await.unwrap();

  assert!(matches!(
    gw.verify_access(&pair.refresh_token).await,
    Err(AuthError::TokenInvalid(_))
  ));
  assert!(matches!(
    gw.refresh(&pair.access_token).await,
    Err(AuthError::TokenInvalid(_))
  ));
}

#[tokio::test]
async fn signout_revokes_only_that_session() {
  let gw = gateway().await;
  let (_, first) = gw.register(Guard::User, registration("Omar")).await.unwrap();
  let second = gw
    .authenticate(Guard::User, "omar@example.com", PASSWORD)
    .await
    .unwrap();

  assert!(matches!(
    gw.signout(Guard::Lawyer, &first.access_token).await,
    Err(AuthError::NotAuthenticated)
  ));

  gw.signout(Guard::User, &first.access_token).await.unwrap();
  assert!(matches!(
    gw.verify_access(&first.access_token).await,
    Err(AuthError::NotAuthenticated)
  ));
  assert!(matches!(
    gw.signout(Guard::User, &first.access_token).await,
    Err(AuthError::NotAuthenticated)
  ));
  gw.verify_access(&second.access_token).await.unwrap();
}

// ─── Staff management ────────────────────────────────────────────────────────

#[tokio::test]
async fn only_admins_manage_staff() {
  let gw = gateway().await;
  let root = admin(&gw).await;
  let (omar, _) = gw.register(Guard::User, registration("Omar")).await.unwrap();
  let plain = ActorContext::from(&omar);

  assert!(matches!(
    gw.create_staff(&plain, RoleName::Employee, registration("Rana")).await,
    Err(AuthError::Forbidden { required: RoleName::Admin })
  ));
  assert!(matches!(
    gw.create_staff(&root, RoleName::Lawyer, registration("Rana")).await,
    Err(AuthError::InvalidRole { .. })
  ));

  let employee = gw
    .create_staff(&root, RoleName::Employee, registration("Rana"))
    .await
    .unwrap();
  assert!(employee.has_role(RoleName::Employee));
  assert_eq!(employee.kind, ActorKind::User);
}

#[tokio::test]
async fn role_changes_apply_to_live_tokens() {
  let gw = gateway().await;
  let root = admin(&gw).await;
  let (omar, pair) = gw.register(Guard::User, registration("Omar")).await.unwrap();

  let promoted = gw
    .set_role(&root, omar.actor_ref(), RoleName::Employee)
    .await
    .unwrap();
  assert!(promoted.has_role(RoleName::Employee));

  // The user-guard token no longer matches the account's role.
  assert!(matches!(
    gw.verify_access(&pair.access_token).await,
    Err(AuthError::RoleMismatch(Guard::User))
  ));
  gw.authenticate(Guard::Employee, "omar@example.com", PASSWORD)
    .await
    .unwrap();

  let (lawyer, _) = gw.register(Guard::Lawyer, registration("Huda")).await.unwrap();
  assert!(matches!(
    gw.set_role(&root, lawyer.actor_ref(), RoleName::Admin).await,
    Err(AuthError::InvalidRole { kind: ActorKind::Lawyer, .. })
  ));
}

#[tokio::test]
async fn deleted_actor_loses_its_session() {
  let gw = gateway().await;
  let root = admin(&gw).await;
  let (huda, pair) = gw.register(Guard::Lawyer, registration("Huda")).await.unwrap();

  gw.delete_actor(&root, huda.actor_ref()).await.unwrap();
  assert!(matches!(
    gw.verify_access(&pair.access_token).await,
    Err(AuthError::NotAuthenticated)
  ));
  assert!(matches!(
    gw.delete_actor(&root, huda.actor_ref()).await,
    Err(AuthError::ActorNotFound { .. })
  ));
  assert!(matches!(
    gw.delete_actor(&root, root.actor_ref()).await,
    Err(AuthError::Validation(_))
  ));

  let ghost = ActorRef::new(ActorKind::Representative, uuid::Uuid::new_v4());
  assert!(matches!(
    gw.delete_actor(&root, ghost).await,
    Err(AuthError::ActorNotFound { .. })
  ));
}
