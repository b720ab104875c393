//! Notifications: immutable, per-recipient records produced by agency
//! transitions.
//!
//! A notification is composed from the agency as it stands after the
//! transition, and is persisted in the same transaction as the agency change.
//! It is never edited afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{
  actor::{Actor, ActorRef},
  agency::Agency,
};

/// Which transition produced a notification.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
  AgencyRequested,
  AgencyForwarded,
  AgencyApproved,
  AgencyRejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub id:             Uuid,
  pub recipient:      ActorRef,
  pub kind:           NotificationKind,
  pub agency_id:      Uuid,
  pub sender_name:    String,
  pub recipient_name: String,
  pub message:        String,
  pub created_at:     DateTime<Utc>,
}

/// Fan a transition out into one notification per recipient.
pub fn compose(
  kind: NotificationKind,
  agency: &Agency,
  sender: &Actor,
  recipients: &[&Actor],
) -> Vec<Notification> {
  let message = message_for(kind, agency, &sender.name);
  let created_at = crate::now();

  recipients
    .iter()
    .map(|recipient| Notification {
      id: Uuid::new_v4(),
      recipient: recipient.actor_ref(),
      kind,
      agency_id: agency.id,
      sender_name: sender.name.clone(),
      recipient_name: recipient.name.clone(),
      message: message.clone(),
      created_at,
    })
    .collect()
}

fn message_for(kind: NotificationKind, agency: &Agency, sender: &str) -> String {
  match kind {
    NotificationKind::AgencyRequested => {
      format!("{sender} requested a power of attorney: {}", agency.cause)
    }
    NotificationKind::AgencyForwarded => {
      let form = agency.kind.map(|k| k.to_string());
      format!(
        "{sender} forwarded a {} power of attorney for registration",
        form.as_deref().unwrap_or("new")
      )
    }
    NotificationKind::AgencyApproved => format!(
      "{sender} approved power of attorney no. {} (record {})",
      agency.sequential_number.as_deref().unwrap_or("-"),
      agency.record_number.as_deref().unwrap_or("-"),
    ),
    NotificationKind::AgencyRejected => {
      format!("{sender} rejected the power-of-attorney request")
    }
  }
}
