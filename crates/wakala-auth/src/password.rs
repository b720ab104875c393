//! Argon2id password hashing and verification.

use std::sync::OnceLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::{AuthError, Result};

/// Hash `password` into a PHC string, e.g. `$argon2id$v=19$…`.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| AuthError::Crypto(format!("hash error: {e}")))
}

/// Run a full verification against a throwaway hash and discard the result,
/// so a sign-in for an unknown email costs as much as a wrong password.
pub fn verify_dummy(password: &str) {
  static DUMMY: OnceLock<Option<String>> = OnceLock::new();
  let dummy = DUMMY.get_or_init(|| hash_password("wakala-dummy-password").ok());
  if let Some(hash) = dummy {
    let _ = verify_password(password, hash);
  }
}

/// Check `password` against a stored PHC hash.
///
/// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
  let parsed = PasswordHash::new(hash)
    .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

  match Argon2::default().verify_password(password.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("correct horse").unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify_password("correct horse", &hash).unwrap());
    assert!(!verify_password("battery staple", &hash).unwrap());
  }

  #[test]
  fn salts_differ() {
    let a = hash_password("same").unwrap();
    let b = hash_password("same").unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn dummy_verification_accepts_any_input() {
    verify_dummy("anything");
    verify_dummy("");
  }

  #[test]
  fn malformed_hash_is_an_error() {
    assert!(matches!(
      verify_password("anything", "not-a-phc-string"),
      Err(AuthError::Crypto(_))
    ));
  }
}
