//! Authentication configuration.

/// Settings for token issuance and password policy.
#[derive(Debug, Clone)]
pub struct AuthConfig {
  /// HS256 signing secret shared by access and refresh tokens.
  pub jwt_secret:             String,
  /// `iss` claim written into and required on every token.
  pub jwt_issuer:             String,
  pub access_token_ttl_secs:  u64,
  pub refresh_token_ttl_secs: u64,
  pub min_password_length:    usize,
}

impl Default for AuthConfig {
  fn default() -> Self {
    Self {
      jwt_secret:             String::new(),
      jwt_issuer:             "wakala".into(),
      access_token_ttl_secs:  3600,
      refresh_token_ttl_secs: 1_209_600,
      min_password_length:    8,
    }
  }
}
