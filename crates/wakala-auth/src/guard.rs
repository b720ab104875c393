//! Guards: the sign-in endpoints, each bound to one credential store and the
//! roles it admits.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use wakala_core::actor::{ActorKind, RoleName};

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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Guard {
  User,
  /// User-table actors whose role is `employee`.
  Employee,
  /// User-table actors whose role is `admin`.
  Admin,
  Lawyer,
  Representative,
}

impl Guard {
  /// The credential store this guard reads.
  pub fn actor_kind(self) -> ActorKind {
    match self {
      Self::User | Self::Employee | Self::Admin => ActorKind::User,
      Self::Lawyer => ActorKind::Lawyer,
      Self::Representative => ActorKind::Representative,
    }
  }

  /// The one role this guard signs in.
  pub fn role(self) -> RoleName {
    match self {
      Self::User => RoleName::User,
      Self::Employee => RoleName::Employee,
      Self::Admin => RoleName::Admin,
      Self::Lawyer => RoleName::Lawyer,
      Self::Representative => RoleName::Representative,
    }
  }

  /// The guard an actor of `kind` holding `role` signs in through.
  pub fn for_actor(kind: ActorKind, role: RoleName) -> Option<Self> {
    let guard = match role {
      RoleName::User => Self::User,
      RoleName::Employee => Self::Employee,
      RoleName::Admin => Self::Admin,
      RoleName::Lawyer => Self::Lawyer,
      RoleName::Representative => Self::Representative,
    };
    (guard.actor_kind() == kind).then_some(guard)
  }

  /// Whether an actor carrying `role` may sign in through this guard.
  pub fn admits(self, role: Option<RoleName>) -> bool { role == Some(self.role()) }

  /// The role given to self-registered actors, if the guard is open.
  pub fn registration_role(self) -> Option<RoleName> {
    match self {
      Self::User | Self::Lawyer | Self::Representative => Some(self.role()),
      Self::Employee | Self::Admin => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn each_user_table_role_has_its_own_guard() {
    assert!(Guard::User.admits(Some(RoleName::User)));
    assert!(!Guard::User.admits(Some(RoleName::Employee)));
    assert!(Guard::Employee.admits(Some(RoleName::Employee)));
    assert!(!Guard::Employee.admits(Some(RoleName::Admin)));
    assert!(Guard::Admin.admits(Some(RoleName::Admin)));
    assert!(!Guard::Admin.admits(Some(RoleName::Employee)));
    assert!(!Guard::Admin.admits(Some(RoleName::User)));
  }

  #[test]
  fn missing_role_is_never_admitted() {
    for guard in [
      Guard::User,
      Guard::Employee,
      Guard::Admin,
      Guard::Lawyer,
      Guard::Representative,
    ] {
      assert!(!guard.admits(None));
    }
  }

  #[test]
  fn guard_follows_kind_and_role() {
    assert_eq!(Guard::for_actor(ActorKind::User, RoleName::Employee), Some(Guard::Employee));
    assert_eq!(Guard::for_actor(ActorKind::User, RoleName::Admin), Some(Guard::Admin));
    assert_eq!(Guard::for_actor(ActorKind::Lawyer, RoleName::Lawyer), Some(Guard::Lawyer));
    assert_eq!(Guard::for_actor(ActorKind::Lawyer, RoleName::Admin), None);
  }

  #[test]
  fn staff_guards_read_the_user_store_and_are_closed() {
    assert_eq!(Guard::Admin.actor_kind(), ActorKind::User);
    assert_eq!(Guard::Employee.actor_kind(), ActorKind::User);
    assert_eq!("representative".parse::<Guard>().unwrap(), Guard::Representative);
    assert_eq!("employee".parse::<Guard>().unwrap(), Guard::Employee);
    assert!(Guard::Admin.registration_role().is_none());
    assert!(Guard::Employee.registration_role().is_none());
  }
}
