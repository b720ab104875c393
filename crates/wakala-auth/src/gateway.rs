//! The authentication gateway: sign-in per guard, registration, refresh,
//! sign-out and access-token verification.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use wakala_core::{
  actor::{Actor, ActorContext, ActorKind, ActorRef, NewActor, RoleName},
  store::{CreateActorOutcome, WorkflowStore},
};

use crate::{
  config::AuthConfig,
  error::{AuthError, Result},
  guard::Guard,
  password,
  token::{self, TokenPair, TokenUse},
};

/// Input for self-registration through a guard.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
  pub name:     String,
  pub email:    String,
  pub password: String,
}

/// A verified access token.
#[derive(Debug, Clone, Copy)]
pub struct Session {
  pub ctx:        ActorContext,
  pub guard:      Guard,
  pub jti:        Uuid,
  pub expires_at: DateTime<Utc>,
}

/// Authentication service, generic over the actor store.
pub struct AuthGateway<S> {
  pub(crate) store:  Arc<S>,
  pub(crate) config: AuthConfig,
}

impl<S> Clone for AuthGateway<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: self.config.clone() }
  }
}

impl<S: WorkflowStore> AuthGateway<S> {
  pub fn new(store: Arc<S>, config: AuthConfig) -> Self { Self { store, config } }

  // ── Sign-in ─────────────────────────────────────────────────────────────

  /// Check `email`/`password` against the guard's credential store and issue
  /// a token pair.
  pub async fn authenticate(
    &self,
    guard: Guard,
    email: &str,
    password: &str,
  ) -> Result<TokenPair> {
    token::signing_secret(&self.config)?;
    let email = email.trim().to_lowercase();
    let found = self
      .store
      .find_actor_by_email(guard.actor_kind(), &email)
      .await
      .map_err(AuthError::store)?;
    let Some(actor) = found else {
      password::verify_dummy(password);
      return Err(AuthError::InvalidCredentials);
    };

    if !password::verify_password(password, &actor.password_hash)? {
      tracing::debug!(%guard, actor_id = %actor.id, "password mismatch");
      return Err(AuthError::InvalidCredentials);
    }
    if !guard.admits(actor.role) {
      tracing::debug!(%guard, actor_id = %actor.id, "role not admitted by guard");
      return Err(AuthError::RoleMismatch(guard));
    }

    let pair = token::issue_pair(actor.id, guard, &self.config)?;
    tracing::info!(%guard, actor_id = %actor.id, "signed in");
    Ok(pair)
  }

  /// Pick the guard an email signs in through.
  ///
  /// The user store is searched first, where the role picks between the admin,
  /// employee and user guards. Then lawyers, then representatives. An actor
  /// without a role has no guard.
  pub async fn determine_guard(&self, email: &str) -> Result<Option<Guard>> {
    let email = email.trim().to_lowercase();
    for kind in [ActorKind::User, ActorKind::Lawyer, ActorKind::Representative] {
      let found = self
        .store
        .find_actor_by_email(kind, &email)
        .await
        .map_err(AuthError::store)?;
      if let Some(actor) = found {
        return Ok(actor.role.and_then(|role| Guard::for_actor(kind, role)));
      }
    }
    Ok(None)
  }

  /// Sign in without naming a guard.
  pub async fn login(&self, email: &str, password: &str) -> Result<(Guard, TokenPair)> {
    let Some(guard) = self.determine_guard(email).await? else {
      password::verify_dummy(password);
      return Err(AuthError::InvalidCredentials);
    };
    let pair = self.authenticate(guard, email, password).await?;
    Ok((guard, pair))
  }

  // ── Registration ────────────────────────────────────────────────────────

  /// Create an actor in the guard's store with the guard's role, and sign it
  /// in.
  pub async fn register(
    &self,
    guard: Guard,
    input: Registration,
  ) -> Result<(Actor, TokenPair)> {
    let role = guard
      .registration_role()
      .ok_or(AuthError::RegistrationClosed(guard))?;
    token::signing_secret(&self.config)?;
    let actor = self.create_account(guard.actor_kind(), role, input).await?;
    let pair = token::issue_pair(actor.id, guard, &self.config)?;
    tracing::info!(%guard, actor_id = %actor.id, "registered");
    Ok((actor, pair))
  }

  pub(crate) async fn create_account(
    &self,
    kind: ActorKind,
    role: RoleName,
    input: Registration,
  ) -> Result<Actor> {
    let name = input.name.trim();
    if name.is_empty() {
      return Err(AuthError::Validation("name is required".into()));
    }
    let email = input.email.trim().to_lowercase();
    if !valid_email(&email) {
      return Err(AuthError::Validation(format!("{email:?} is not an email address")));
    }
    if input.password.chars().count() < self.config.min_password_length {
      return Err(AuthError::Validation(format!(
        "password must be at least {} characters",
        self.config.min_password_length
      )));
    }

    let outcome = self
      .store
      .create_actor(NewActor {
        kind,
        name: name.to_owned(),
        email: email.clone(),
        password_hash: password::hash_password(&input.password)?,
        role,
      })
      .await
      .map_err(AuthError::store)?;

    match outcome {
      CreateActorOutcome::Created(actor) => Ok(actor),
      CreateActorOutcome::EmailTaken => Err(AuthError::EmailTaken(email)),
    }
  }

  // ── Token lifecycle ─────────────────────────────────────────────────────

  /// Trade a refresh token for a new pair. Each refresh token works once.
  pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
    let claims = token::decode(refresh_token, TokenUse::Refresh, &self.config)?;

    let actor = self.bearer(claims.kind, claims.sub).await?;
    if !claims.guard.admits(actor.role) {
      return Err(AuthError::RoleMismatch(claims.guard));
    }

    let first_use = self
      .store
      .revoke_token(claims.jti, claims.expires_at())
      .await
      .map_err(AuthError::store)?;
    if !first_use {
      tracing::debug!(jti = %claims.jti, "refresh token replayed");
      return Err(AuthError::TokenInvalid("refresh token already used".into()));
    }

    let pair = token::issue_pair(actor.id, claims.guard, &self.config)?;
    tracing::info!(guard = %claims.guard, actor_id = %actor.id, "tokens refreshed");
    Ok(pair)
  }

  /// Invalidate the access token of a `guard` session.
  pub async fn signout(&self, guard: Guard, access_token: &str) -> Result<()> {
    let session = self.verify_access(access_token).await?;
    if session.guard != guard {
      return Err(AuthError::NotAuthenticated);
    }

    self
      .store
      .revoke_token(session.jti, session.expires_at)
      .await
      .map_err(AuthError::store)?;
    tracing::info!(%guard, actor_id = %session.ctx.id, "signed out");
    Ok(())
  }

  /// Resolve an access token into the identity workflow calls run under.
  ///
  /// The role is read from the store on every call, so role changes and
  /// deletions take effect before the token expires.
  pub async fn verify_access(&self, access_token: &str) -> Result<Session> {
    let claims = token::decode(access_token, TokenUse::Access, &self.config)?;

    let revoked = self
      .store
      .is_token_revoked(claims.jti)
      .await
      .map_err(AuthError::store)?;
    if revoked {
      return Err(AuthError::NotAuthenticated);
    }

    let actor = self.bearer(claims.kind, claims.sub).await?;
    if !claims.guard.admits(actor.role) {
      return Err(AuthError::RoleMismatch(claims.guard));
    }

    Ok(Session {
      ctx:        ActorContext::from(&actor),
      guard:      claims.guard,
      jti:        claims.jti,
      expires_at: claims.expires_at(),
    })
  }

  /// The account behind a verified session.
  pub async fn profile(&self, ctx: &ActorContext) -> Result<Actor> {
    self.bearer(ctx.kind, ctx.id).await
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  /// The actor a token names. A deleted actor no longer has a session.
  async fn bearer(&self, kind: ActorKind, id: Uuid) -> Result<Actor> {
    match self.load_actor(kind, id).await {
      Err(AuthError::ActorNotFound { .. }) => Err(AuthError::NotAuthenticated),
      other => other,
    }
  }

  pub(crate) async fn load_actor(&self, kind: ActorKind, id: Uuid) -> Result<Actor> {
    self
      .store
      .get_actor(ActorRef::new(kind, id))
      .await
      .map_err(AuthError::store)?
      .ok_or(AuthError::ActorNotFound { kind, id })
  }
}

/// Minimal shape check: one `@` with something on both sides and a dot in
/// the domain.
fn valid_email(email: &str) -> bool {
  match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
    }
    None => false,
  }
}
