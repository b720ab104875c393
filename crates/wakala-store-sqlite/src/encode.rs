//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar dates as
//! `YYYY-MM-DD`, so both sort correctly as text. Enums are stored as their
//! lowercase names. Authorization id lists are stored as compact JSON.
//! UUIDs are stored as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use wakala_core::{
  actor::{Actor, ActorKind, ActorRef},
  agency::{Agency, AgencyStatus, AgencyType},
  authorization::Authorization,
  issue::Issue,
  notification::{Notification, NotificationKind},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// Fixed-width so that stored timestamps order correctly as text.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Any of the core's lowercase string enums.
pub fn encode_enum<E: Into<&'static str>>(value: E) -> String {
  value.into().to_owned()
}

pub fn decode_enum<E: FromStr>(column: &str, s: &str) -> Result<E> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown {column}: {s:?}")))
}

pub fn encode_ids(ids: &[Uuid]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn decode_ids(s: &str) -> Result<Vec<Uuid>> { Ok(serde_json::from_str(s)?) }

// ─── Actors ──────────────────────────────────────────────────────────────────

/// Raw strings read from an `actors` row joined with `roles`.
pub struct RawActor {
  pub actor_id:      String,
  pub kind:          String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
  pub role:          Option<String>,
}

impl RawActor {
  pub const COLUMNS: &'static str = "a.actor_id, a.kind, a.name, a.email, \
                                     a.password_hash, a.created_at, r.name";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      actor_id:      row.get(0)?,
      kind:          row.get(1)?,
      name:          row.get(2)?,
      email:         row.get(3)?,
      password_hash: row.get(4)?,
      created_at:    row.get(5)?,
      role:          row.get(6)?,
    })
  }

  pub fn into_actor(self) -> Result<Actor> {
    Ok(Actor {
      id:            decode_uuid(&self.actor_id)?,
      kind:          decode_enum("actor kind", &self.kind)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          self
        .role
        .as_deref()
        .map(|r| decode_enum("role", r))
        .transpose()?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

// ─── Authorizations ──────────────────────────────────────────────────────────

pub struct RawAuthorization {
  pub authorization_id: String,
  pub name:             String,
  pub created_at:       String,
}

impl RawAuthorization {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      authorization_id: row.get(0)?,
      name:             row.get(1)?,
      created_at:       row.get(2)?,
    })
  }

  pub fn into_authorization(self) -> Result<Authorization> {
    Ok(Authorization {
      id:         decode_uuid(&self.authorization_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

// ─── Agencies ────────────────────────────────────────────────────────────────

/// An `agencies` row as plain column values, in both directions.
#[derive(Debug, Clone)]
pub struct RawAgency {
  pub agency_id:         String,
  pub sequential_number: Option<String>,
  pub record_number:     Option<String>,
  pub user_id:           String,
  pub lawyer_id:         String,
  pub representative_id: Option<String>,
  pub cause:             String,
  pub kind:              Option<String>,
  pub authorizations:    String,
  pub exceptions:        Option<String>,
  pub place_of_issue:    Option<String>,
  pub status:            String,
  pub is_active:         bool,
  pub version:           i64,
  pub created_at:        String,
  pub created_on:        String,
  pub updated_at:        String,
}

impl RawAgency {
  pub const COLUMNS: &'static str = "agency_id, sequential_number, record_number, \
     user_id, lawyer_id, representative_id, cause, kind, authorizations, \
     exceptions, place_of_issue, status, is_active, version, created_at, \
     created_on, updated_at";

  pub fn from_agency(a: &Agency) -> Result<Self> {
    Ok(Self {
      agency_id:         encode_uuid(a.id),
      sequential_number: a.sequential_number.clone(),
      record_number:     a.record_number.clone(),
      user_id:           encode_uuid(a.user_id),
      lawyer_id:         encode_uuid(a.lawyer_id),
      representative_id: a.representative_id.map(encode_uuid),
      cause:             a.cause.clone(),
      kind:              a.kind.map(encode_enum::<AgencyType>),
      authorizations:    encode_ids(&a.authorizations)?,
      exceptions:        a.exceptions.clone(),
      place_of_issue:    a.place_of_issue.clone(),
      status:            encode_enum::<AgencyStatus>(a.status),
      is_active:         a.is_active,
      version:           a.version,
      created_at:        encode_dt(a.created_at),
      created_on:        encode_date(a.created_at.date_naive()),
      updated_at:        encode_dt(a.updated_at),
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      agency_id:         row.get(0)?,
      sequential_number: row.get(1)?,
      record_number:     row.get(2)?,
      user_id:           row.get(3)?,
      lawyer_id:         row.get(4)?,
      representative_id: row.get(5)?,
      cause:             row.get(6)?,
      kind:              row.get(7)?,
      authorizations:    row.get(8)?,
      exceptions:        row.get(9)?,
      place_of_issue:    row.get(10)?,
      status:            row.get(11)?,
      is_active:         row.get(12)?,
      version:           row.get(13)?,
      created_at:        row.get(14)?,
      created_on:        row.get(15)?,
      updated_at:        row.get(16)?,
    })
  }

  pub fn into_agency(self) -> Result<Agency> {
    Ok(Agency {
      id:                decode_uuid(&self.agency_id)?,
      sequential_number: self.sequential_number,
      record_number:     self.record_number,
      user_id:           decode_uuid(&self.user_id)?,
      lawyer_id:         decode_uuid(&self.lawyer_id)?,
      representative_id: self
        .representative_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      cause:             self.cause,
      kind:              self
        .kind
        .as_deref()
        .map(|k| decode_enum("agency type", k))
        .transpose()?,
      authorizations:    decode_ids(&self.authorizations)?,
      exceptions:        self.exceptions,
      place_of_issue:    self.place_of_issue,
      status:            decode_enum("agency status", &self.status)?,
      is_active:         self.is_active,
      version:           self.version,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Issues ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RawIssue {
  pub issue_id:       String,
  pub agency_id:      String,
  pub lawyer_id:      String,
  pub base_number:    String,
  pub record_number:  String,
  pub court_name:     String,
  pub kind:           String,
  pub start_date:     String,
  pub end_date:       Option<String>,
  pub status:         String,
  pub estimated_cost: f64,
  pub is_active:      bool,
  pub success_rate:   Option<u8>,
  pub version:        i64,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawIssue {
  pub const COLUMNS: &'static str = "issue_id, agency_id, lawyer_id, base_number, \
     record_number, court_name, kind, start_date, end_date, status, \
     estimated_cost, is_active, success_rate, version, created_at, updated_at";

  pub fn from_issue(i: &Issue) -> Self {
    Self {
      issue_id:       encode_uuid(i.id),
      agency_id:      encode_uuid(i.agency_id),
      lawyer_id:      encode_uuid(i.lawyer_id),
      base_number:    i.base_number.clone(),
      record_number:  i.record_number.clone(),
      court_name:     i.court_name.clone(),
      kind:           i.kind.clone(),
      start_date:     encode_date(i.start_date),
      end_date:       i.end_date.map(encode_date),
      status:         i.status.clone(),
      estimated_cost: i.estimated_cost,
      is_active:      i.is_active,
      success_rate:   i.success_rate,
      version:        i.version,
      created_at:     encode_dt(i.created_at),
      updated_at:     encode_dt(i.updated_at),
    }
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      issue_id:       row.get(0)?,
      agency_id:      row.get(1)?,
      lawyer_id:      row.get(2)?,
      base_number:    row.get(3)?,
      record_number:  row.get(4)?,
      court_name:     row.get(5)?,
      kind:           row.get(6)?,
      start_date:     row.get(7)?,
      end_date:       row.get(8)?,
      status:         row.get(9)?,
      estimated_cost: row.get(10)?,
      is_active:      row.get(11)?,
      success_rate:   row.get(12)?,
      version:        row.get(13)?,
      created_at:     row.get(14)?,
      updated_at:     row.get(15)?,
    })
  }

  pub fn into_issue(self) -> Result<Issue> {
    Ok(Issue {
      id:             decode_uuid(&self.issue_id)?,
      agency_id:      decode_uuid(&self.agency_id)?,
      lawyer_id:      decode_uuid(&self.lawyer_id)?,
      base_number:    self.base_number,
      record_number:  self.record_number,
      court_name:     self.court_name,
      kind:           self.kind,
      start_date:     decode_date(&self.start_date)?,
      end_date:       self.end_date.as_deref().map(decode_date).transpose()?,
      status:         self.status,
      estimated_cost: self.estimated_cost,
      is_active:      self.is_active,
      success_rate:   self.success_rate,
      version:        self.version,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RawNotification {
  pub notification_id: String,
  pub recipient_kind:  String,
  pub recipient_id:    String,
  pub kind:            String,
  pub agency_id:       String,
  pub sender_name:     String,
  pub recipient_name:  String,
  pub message:         String,
  pub created_at:      String,
}

impl RawNotification {
  pub const COLUMNS: &'static str = "notification_id, recipient_kind, \
     recipient_id, kind, agency_id, sender_name, recipient_name, message, \
     created_at";

  pub fn from_notification(n: &Notification) -> Self {
    Self {
      notification_id: encode_uuid(n.id),
      recipient_kind:  encode_enum::<ActorKind>(n.recipient.kind),
      recipient_id:    encode_uuid(n.recipient.id),
      kind:            encode_enum::<NotificationKind>(n.kind),
      agency_id:       encode_uuid(n.agency_id),
      sender_name:     n.sender_name.clone(),
      recipient_name:  n.recipient_name.clone(),
      message:         n.message.clone(),
      created_at:      encode_dt(n.created_at),
    }
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      notification_id: row.get(0)?,
      recipient_kind:  row.get(1)?,
      recipient_id:    row.get(2)?,
      kind:            row.get(3)?,
      agency_id:       row.get(4)?,
      sender_name:     row.get(5)?,
      recipient_name:  row.get(6)?,
      message:         row.get(7)?,
      created_at:      row.get(8)?,
    })
  }

  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      id:             decode_uuid(&self.notification_id)?,
      recipient:      ActorRef::new(
        decode_enum("actor kind", &self.recipient_kind)?,
        decode_uuid(&self.recipient_id)?,
      ),
      kind:           decode_enum("notification kind", &self.kind)?,
      agency_id:      decode_uuid(&self.agency_id)?,
      sender_name:    self.sender_name,
      recipient_name: self.recipient_name,
      message:        self.message,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}
