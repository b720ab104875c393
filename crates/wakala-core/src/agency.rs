//! Agency: a power-of-attorney request and its lifecycle state.
//!
//! An agency is created by a user against a lawyer, forwarded by that lawyer
//! to a representative, and resolved by the representative. Status only moves
//! forward (`pending` → `approved` | `rejected`), and `is_active` can only
//! become true through approval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

// ─── Enums ───────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgencyStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

impl AgencyStatus {
  /// Approved and rejected agencies accept no further resolution.
  pub fn is_resolved(self) -> bool { self != Self::Pending }
}

/// The legal form of the power of attorney, chosen by the lawyer on forward.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgencyType {
  Public,
  Private,
  Legitimacy,
}

// ─── Agency ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agency {
  pub id:                Uuid,
  /// Assigned on approval; immutable and globally unique afterwards.
  pub sequential_number: Option<String>,
  /// Assigned on approval; immutable and globally unique afterwards.
  pub record_number:     Option<String>,
  pub user_id:           Uuid,
  pub lawyer_id:         Uuid,
  pub representative_id: Option<Uuid>,
  pub cause:             String,
  #[serde(rename = "type")]
  pub kind:              Option<AgencyType>,
  pub authorizations:    Vec<Uuid>,
  pub exceptions:        Option<String>,
  pub place_of_issue:    Option<String>,
  pub status:            AgencyStatus,
  pub is_active:         bool,
  /// Optimistic concurrency token; bumped by every committed mutation.
  pub version:           i64,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

impl Agency {
  /// A fresh, pending and inactive request.
  pub fn new(user_id: Uuid, lawyer_id: Uuid, cause: String) -> Self {
    let now = crate::now();
    Self {
      id: Uuid::new_v4(),
      sequential_number: None,
      record_number: None,
      user_id,
      lawyer_id,
      representative_id: None,
      cause,
      kind: None,
      authorizations: Vec::new(),
      exceptions: None,
      place_of_issue: None,
      status: AgencyStatus::Pending,
      is_active: false,
      version: 0,
      created_at: now,
      updated_at: now,
    }
  }

  /// Approved and still active: the only state that can back an issue.
  pub fn is_in_force(&self) -> bool {
    self.is_active && self.status == AgencyStatus::Approved
  }

  /// Whether `actor_id` takes part in this agency under any role.
  pub fn involves(&self, actor_id: Uuid) -> bool {
    self.user_id == actor_id
      || self.lawyer_id == actor_id
      || self.representative_id == Some(actor_id)
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Lawyer payload for routing an agency to a representative.
#[derive(Debug, Clone, Deserialize)]
pub struct ForwardAgency {
  pub representative_id: Uuid,
  #[serde(rename = "type")]
  pub kind:              AgencyType,
  #[serde(default)]
  pub authorizations:    Vec<Uuid>,
  pub exceptions:        Option<String>,
}

/// Representative payload for approving or rejecting an agency.
///
/// Numbers and place of issue are required only when `status` is
/// [`AgencyStatus::Approved`].
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveAgency {
  pub status:            AgencyStatus,
  pub sequential_number: Option<String>,
  pub record_number:     Option<String>,
  pub place_of_issue:    Option<String>,
}

/// Filters for [`crate::store::WorkflowStore::list_agencies`].
#[derive(Debug, Clone, Default)]
pub struct AgencyQuery {
  pub user_id:           Option<Uuid>,
  pub lawyer_id:         Option<Uuid>,
  pub representative_id: Option<Uuid>,
  pub status:            Option<AgencyStatus>,
}
