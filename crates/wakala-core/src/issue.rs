//! Issue: a legal case a lawyer tracks under an agency that is in force.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
  pub id:             Uuid,
  pub agency_id:      Uuid,
  pub lawyer_id:      Uuid,
  pub base_number:    String,
  pub record_number:  String,
  pub court_name:     String,
  #[serde(rename = "type")]
  pub kind:           String,
  pub start_date:     NaiveDate,
  pub end_date:       Option<NaiveDate>,
  /// Free-text progress note, updated while the issue is active.
  pub status:         String,
  pub estimated_cost: f64,
  pub is_active:      bool,
  /// Percentage in `0..=100`, set when the issue is finished.
  pub success_rate:   Option<u8>,
  pub version:        i64,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Issue {
  /// Finished issues are terminal; nothing moves them back.
  pub fn is_finished(&self) -> bool {
    !self.is_active && self.end_date.is_some() && self.success_rate.is_some()
  }
}

/// Lawyer payload for opening an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIssue {
  pub base_number:    String,
  pub record_number:  String,
  pub court_name:     String,
  #[serde(rename = "type")]
  pub kind:           String,
  pub start_date:     NaiveDate,
  pub estimated_cost: f64,
  #[serde(default)]
  pub status:         Option<String>,
}

/// Lawyer payload for closing an issue. Both fields must be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinishIssue {
  pub end_date:     Option<NaiveDate>,
  pub success_rate: Option<u8>,
}

impl FinishIssue {
  pub fn new(end_date: NaiveDate, success_rate: u8) -> Self {
    Self { end_date: Some(end_date), success_rate: Some(success_rate) }
  }
}
