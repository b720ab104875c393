//! HS256 JWT access and refresh tokens.
//!
//! Both halves of a pair carry the same claim set; `token_use` tells them
//! apart so a refresh token is never accepted as an access credential and vice
//! versa.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wakala_core::actor::ActorKind;

use crate::{
  config::AuthConfig,
  error::{AuthError, Result},
  guard::Guard,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
  Access,
  Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// Actor id.
  pub sub:       Uuid,
  pub kind:      ActorKind,
  pub guard:     Guard,
  pub iss:       String,
  pub iat:       i64,
  pub exp:       i64,
  pub jti:       Uuid,
  pub token_use: TokenUse,
}

impl Claims {
  pub fn new(
    subject: Uuid,
    guard: Guard,
    token_use: TokenUse,
    config: &AuthConfig,
  ) -> Self {
    let ttl = match token_use {
      TokenUse::Access => config.access_token_ttl_secs,
      TokenUse::Refresh => config.refresh_token_ttl_secs,
    };
    let now = Utc::now().timestamp();
    Self {
      sub: subject,
      kind: guard.actor_kind(),
      guard,
      iss: config.jwt_issuer.clone(),
      iat: now,
      exp: now.saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX)),
      jti: Uuid::new_v4(),
      token_use,
    }
  }

  /// When the token stops being accepted.
  pub fn expires_at(&self) -> DateTime<Utc> {
    DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
  }
}

/// What a successful sign-in or refresh hands back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
  pub access_token:  String,
  pub refresh_token: String,
  pub token_type:    String,
  /// Access token lifetime in seconds.
  pub expires_in:    u64,
}

/// The configured HS256 key. An empty secret is refused rather than used.
pub fn signing_secret(config: &AuthConfig) -> Result<&[u8]> {
  if config.jwt_secret.trim().is_empty() {
    return Err(AuthError::Crypto("jwt_secret is not configured".into()));
  }
  Ok(config.jwt_secret.as_bytes())
}

/// Sign `claims` with the configured secret.
pub fn encode(claims: &Claims, config: &AuthConfig) -> Result<String> {
  let key = EncodingKey::from_secret(signing_secret(config)?);
  jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &key)
    .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Verify signature, expiry and issuer, and require the expected `token_use`.
pub fn decode(token: &str, expected: TokenUse, config: &AuthConfig) -> Result<Claims> {
  let key = DecodingKey::from_secret(signing_secret(config)?);
  let mut validation = Validation::new(Algorithm::HS256);
  validation.set_issuer(&[&config.jwt_issuer]);
  validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

  let claims = jsonwebtoken::decode::<Claims>(token, &key, &validation)
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
      jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
      _ => AuthError::TokenInvalid(e.to_string()),
    })?;

  if claims.token_use != expected {
    return Err(AuthError::TokenInvalid(format!(
      "expected {expected:?} token, got {:?}",
      claims.token_use
    )));
  }
  if claims.kind != claims.guard.actor_kind() {
    return Err(AuthError::TokenInvalid("guard and kind disagree".into()));
  }
  Ok(claims)
}

/// Issue a fresh access/refresh pair for one actor.
pub fn issue_pair(subject: Uuid, guard: Guard, config: &AuthConfig) -> Result<TokenPair> {
  let access = Claims::new(subject, guard, TokenUse::Access, config);
  let refresh = Claims::new(subject, guard, TokenUse::Refresh, config);
  Ok(TokenPair {
    access_token:  encode(&access, config)?,
    refresh_token: encode(&refresh, config)?,
    token_type:    "bearer".into(),
    expires_in:    config.access_token_ttl_secs,
  })
}
