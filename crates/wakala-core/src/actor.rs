//! Actors (the four authenticatable entity kinds) and the flat role tag
//! attached to each of them.
//!
//! Roles are not a hierarchy. Every actor owns exactly one [`RoleName`], created in
//! the same transaction as the actor and deleted with it. The role is stored in
//! a lookup table keyed by `(actor_kind, actor_id)`, so no runtime type strings
//! are involved in resolving it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

// ─── Kinds and roles ─────────────────────────────────────────────────────────

/// The credential store an actor lives in.
///
/// Employees and admins are stored as [`ActorKind::User`] records whose role is
/// `employee` or `admin`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActorKind {
  User,
  Lawyer,
  Representative,
}

/// The single role tag an actor carries.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleName {
  User,
  Employee,
  Admin,
  Lawyer,
  Representative,
}

impl RoleName {
  /// Whether an actor of `kind` may carry this role at all.
  pub fn fits(self, kind: ActorKind) -> bool {
    match kind {
      ActorKind::User => {
        matches!(self, Self::User | Self::Employee | Self::Admin)
      }
      ActorKind::Lawyer => self == Self::Lawyer,
      ActorKind::Representative => self == Self::Representative,
    }
  }

  /// Roles that belong to staff rather than to the public.
  pub fn is_staff(self) -> bool { matches!(self, Self::Employee | Self::Admin) }
}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// A typed reference to an actor, used wherever the kind matters as much as
/// the id (notification recipients, token subjects).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
  pub kind: ActorKind,
  pub id:   Uuid,
}

impl ActorRef {
  pub fn new(kind: ActorKind, id: Uuid) -> Self { Self { kind, id } }
}

/// A persisted actor together with its attached role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
  pub id:            Uuid,
  pub kind:          ActorKind,
  pub name:          String,
  pub email:         String,
  /// PHC string produced by argon2.
  #[serde(skip_serializing)]
  pub password_hash: String,
  /// `None` only if the role row has gone missing; treated as unauthorized.
  pub role:          Option<RoleName>,
  pub created_at:    DateTime<Utc>,
}

impl Actor {
  pub fn actor_ref(&self) -> ActorRef { ActorRef::new(self.kind, self.id) }

  /// True iff the attached role exists and equals `role`.
  pub fn has_role(&self, role: RoleName) -> bool { self.role == Some(role) }
}

/// Input to [`crate::store::WorkflowStore::create_actor`].
#[derive(Debug, Clone)]
pub struct NewActor {
  pub kind:          ActorKind,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          RoleName,
}

/// The identity a workflow call is made under.
///
/// Built by the authentication layer from a verified access token and passed
/// explicitly into every workflow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
  pub kind: ActorKind,
  pub id:   Uuid,
  pub role: Option<RoleName>,
}

impl ActorContext {
  pub fn has_role(&self, role: RoleName) -> bool { self.role == Some(role) }

  pub fn actor_ref(&self) -> ActorRef { ActorRef::new(self.kind, self.id) }
}

impl From<&Actor> for ActorContext {
  fn from(actor: &Actor) -> Self {
    Self { kind: actor.kind, id: actor.id, role: actor.role }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn actor(role: Option<RoleName>) -> Actor {
    Actor {
      id: Uuid::new_v4(),
      kind: ActorKind::User,
      name: "Layla".into(),
      email: "layla@example.com".into(),
      password_hash: String::new(),
      role,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn has_role_is_flat_comparison() {
    let admin = actor(Some(RoleName::Admin));
    assert!(admin.has_role(RoleName::Admin));
    assert!(!admin.has_role(RoleName::Employee));
    assert!(!admin.has_role(RoleName::User));
  }

  #[test]
  fn missing_role_matches_nothing() {
    let orphan = actor(None);
    for role in [
      RoleName::User,
      RoleName::Employee,
      RoleName::Admin,
      RoleName::Lawyer,
      RoleName::Representative,
    ] {
      assert!(!orphan.has_role(role));
    }
  }

  #[test]
  fn role_fits_kind() {
    assert!(RoleName::Employee.fits(ActorKind::User));
    assert!(!RoleName::Lawyer.fits(ActorKind::User));
    assert!(RoleName::Representative.fits(ActorKind::Representative));
    assert!(!RoleName::Admin.fits(ActorKind::Lawyer));
  }

  #[test]
  fn kind_round_trips_through_strings() {
    let s: &'static str = ActorKind::Representative.into();
    assert_eq!(s, "representative");
    assert_eq!(
      "lawyer".parse::<ActorKind>().unwrap(),
      ActorKind::Lawyer
    );
    assert!("admin".parse::<ActorKind>().is_err());
  }
}
