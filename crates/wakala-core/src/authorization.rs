//! Authorization: a named power that a forwarded agency can grant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
  pub id:         Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

impl Authorization {
  pub fn new(name: String) -> Self {
    Self { id: Uuid::new_v4(), name, created_at: crate::now() }
  }
}
