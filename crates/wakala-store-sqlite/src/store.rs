//! [`SqliteStore`], the SQLite implementation of [`WorkflowStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use wakala_core::{
  actor::{Actor, ActorKind, ActorRef, NewActor, RoleName},
  agency::{Agency, AgencyQuery, AgencyStatus},
  authorization::Authorization,
  issue::Issue,
  notification::Notification,
  store::{
    AgencyCommit, CommitOutcome, CreateActorOutcome, InsertAgencyOutcome,
    WorkflowStore,
  },
};

use crate::{
  Result,
  encode::{
    RawActor, RawAgency, RawAuthorization, RawIssue, RawNotification, encode_dt,
    encode_enum, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Wakala store backed by a single SQLite file.
///
/// Clones share the inner connection. All calls
/// run on the connection's single worker thread, and every multi-statement
/// write opens a `BEGIN IMMEDIATE` transaction, so read-check-write sequences
/// cannot interleave.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Result of a version-guarded write inside a transaction.
enum Guarded {
  Written,
  Stale,
  Duplicate(&'static str),
  AgencyInactive(Uuid),
}

impl Guarded {
  fn into_outcome<T>(self, value: T) -> CommitOutcome<T> {
    match self {
      Self::Written => CommitOutcome::Committed(value),
      Self::Stale => CommitOutcome::Stale,
      Self::Duplicate(field) => CommitOutcome::Duplicate { field },
      Self::AgencyInactive(agency_id) => CommitOutcome::AgencyInactive { agency_id },
    }
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// In-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Row count of `table`, for asserting cascade and rollback behaviour.
  #[cfg(test)]
  pub(crate) async fn count_rows(&self, table: &'static str) -> Result<i64> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
      })
      .await?;
    Ok(n)
  }

  async fn fetch_actor(
    &self,
    condition: &'static str,
    kind: ActorKind,
    key: String,
  ) -> Result<Option<Actor>> {
    let kind_str = encode_enum(kind);

    let raw: Option<RawActor> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {}
           FROM actors a
           LEFT JOIN roles r ON r.actor_kind = a.kind AND r.actor_id = a.actor_id
           WHERE a.kind = ?1 AND {condition}",
          RawActor::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![kind_str, key], RawActor::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActor::into_actor).transpose()
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn insert_notifications(
  conn: &rusqlite::Connection,
  rows: &[RawNotification],
) -> rusqlite::Result<()> {
  let mut stmt = conn.prepare(&format!(
    "INSERT INTO notifications ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    RawNotification::COLUMNS
  ))?;
  for n in rows {
    stmt.execute(rusqlite::params![
      n.notification_id,
      n.recipient_kind,
      n.recipient_id,
      n.kind,
      n.agency_id,
      n.sender_name,
      n.recipient_name,
      n.message,
      n.created_at,
    ])?;
  }
  Ok(())
}

/// Whether `value` is held in `table.column` by a row other than `except_id`.
fn number_taken(
  conn: &rusqlite::Connection,
  table: &'static str,
  id_column: &'static str,
  column: &'static str,
  value: &str,
  except_id: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        &format!(
          "SELECT 1 FROM {table} WHERE {column} = ?1 AND {id_column} != ?2"
        ),
        rusqlite::params![value, except_id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn agency_number_clash(
  conn: &rusqlite::Connection,
  raw: &RawAgency,
) -> rusqlite::Result<Option<&'static str>> {
  let candidates = [
    ("sequential_number", raw.sequential_number.as_deref()),
    ("record_number", raw.record_number.as_deref()),
  ];
  for (column, value) in candidates {
    if let Some(value) = value
      && number_taken(conn, "agencies", "agency_id", column, value, &raw.agency_id)?
    {
      return Ok(Some(column));
    }
  }
  Ok(None)
}

/// Whether the agency is approved and active, as seen by `conn`'s transaction.
fn agency_in_force(conn: &rusqlite::Connection, agency_id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM agencies
         WHERE agency_id = ?1 AND is_active = 1 AND status = ?2",
        rusqlite::params![agency_id, encode_enum(AgencyStatus::Approved)],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn issue_number_clash(
  conn: &rusqlite::Connection,
  raw: &RawIssue,
) -> rusqlite::Result<Option<&'static str>> {
  for (column, value) in [
    ("base_number", raw.base_number.as_str()),
    ("record_number", raw.record_number.as_str()),
  ] {
    if number_taken(conn, "issues", "issue_id", column, value, &raw.issue_id)? {
      return Ok(Some(column));
    }
  }
  Ok(None)
}

// ─── WorkflowStore impl ──────────────────────────────────────────────────────

impl WorkflowStore for SqliteStore {
  type Error = crate::Error;

  // ── Actors ────────────────────────────────────────────────────────────────

  async fn create_actor(&self, input: NewActor) -> Result<CreateActorOutcome> {
    let actor = Actor {
      id:            Uuid::new_v4(),
      kind:          input.kind,
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      role:          Some(input.role),
      created_at:    wakala_core::now(),
    };

    let id_str   = encode_uuid(actor.id);
    let kind_str = encode_enum(actor.kind);
    let role_str = encode_enum(input.role);
    let name     = actor.name.clone();
    let email    = actor.email.clone();
    let hash     = actor.password_hash.clone();
    let at_str   = encode_dt(actor.created_at);

    let created = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let taken = tx
          .query_row(
            "SELECT 1 FROM actors WHERE kind = ?1 AND email = ?2",
            rusqlite::params![kind_str, email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO actors (actor_id, kind, name, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, kind_str, name, email, hash, at_str],
        )?;
        tx.execute(
          "INSERT INTO roles (actor_kind, actor_id, name) VALUES (?1, ?2, ?3)",
          rusqlite::params![kind_str, id_str, role_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(if created {
      CreateActorOutcome::Created(actor)
    } else {
      CreateActorOutcome::EmailTaken
    })
  }

  async fn get_actor(&self, actor: ActorRef) -> Result<Option<Actor>> {
    self
      .fetch_actor("a.actor_id = ?2", actor.kind, encode_uuid(actor.id))
      .await
  }

  async fn find_actor_by_email(
    &self,
    kind: ActorKind,
    email: &str,
  ) -> Result<Option<Actor>> {
    self.fetch_actor("a.email = ?2", kind, email.to_owned()).await
  }

  async fn set_role(&self, actor: ActorRef, role: RoleName) -> Result<bool> {
    let kind_str = encode_enum(actor.kind);
    let id_str   = encode_uuid(actor.id);
    let role_str = encode_enum(role);

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM actors WHERE kind = ?1 AND actor_id = ?2",
            rusqlite::params![kind_str, id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO roles (actor_kind, actor_id, name) VALUES (?1, ?2, ?3)
           ON CONFLICT (actor_kind, actor_id) DO UPDATE SET name = excluded.name",
          rusqlite::params![kind_str, id_str, role_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(updated)
  }

  async fn delete_actor(&self, actor: ActorRef) -> Result<bool> {
    let kind_str = encode_enum(actor.kind);
    let id_str   = encode_uuid(actor.id);

    let deleted = self
      .conn
      .call(move |conn| {
        // The role row goes with it via ON DELETE CASCADE.
        let n = conn.execute(
          "DELETE FROM actors WHERE kind = ?1 AND actor_id = ?2",
          rusqlite::params![kind_str, id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  // ── Authorizations ────────────────────────────────────────────────────────

  async fn add_authorization(&self, authorization: Authorization) -> Result<Authorization> {
    let id_str = encode_uuid(authorization.id);
    let name   = authorization.name.clone();
    let at_str = encode_dt(authorization.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO authorizations (authorization_id, name, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(authorization)
  }

  async fn list_authorizations(&self) -> Result<Vec<Authorization>> {
    let raws: Vec<RawAuthorization> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT authorization_id, name, created_at
           FROM authorizations ORDER BY name",
        )?;
        let rows = stmt
          .query_map([], RawAuthorization::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAuthorization::into_authorization).collect()
  }

  async fn get_authorizations(&self, ids: &[Uuid]) -> Result<Vec<Authorization>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawAuthorization> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; id_strs.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
          "SELECT authorization_id, name, created_at
           FROM authorizations WHERE authorization_id IN ({placeholders})"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(id_strs.iter()),
            RawAuthorization::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAuthorization::into_authorization).collect()
  }

  // ── Agencies ──────────────────────────────────────────────────────────────

  async fn insert_agency(
    &self,
    agency: Agency,
    notifications: Vec<Notification>,
    daily_limit: u32,
  ) -> Result<InsertAgencyOutcome> {
    let raw = RawAgency::from_agency(&agency)?;
    let notes: Vec<RawNotification> = notifications
      .iter()
      .map(RawNotification::from_notification)
      .collect();

    let over_limit: Option<u32> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let count: u32 = tx.query_row(
          "SELECT COUNT(*) FROM agencies
           WHERE user_id = ?1 AND lawyer_id = ?2 AND created_on = ?3",
          rusqlite::params![raw.user_id, raw.lawyer_id, raw.created_on],
          |r| r.get(0),
        )?;
        if count >= daily_limit {
          return Ok(Some(count));
        }

        tx.execute(
          &format!(
            "INSERT INTO agencies ({}) VALUES
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            RawAgency::COLUMNS
          ),
          rusqlite::params![
            raw.agency_id,
            raw.sequential_number,
            raw.record_number,
            raw.user_id,
            raw.lawyer_id,
            raw.representative_id,
            raw.cause,
            raw.kind,
            raw.authorizations,
            raw.exceptions,
            raw.place_of_issue,
            raw.status,
            raw.is_active,
            raw.version,
            raw.created_at,
            raw.created_on,
            raw.updated_at,
          ],
        )?;
        insert_notifications(&tx, &notes)?;
        tx.commit()?;
        Ok(None)
      })
      .await?;

    Ok(match over_limit {
      Some(count) => InsertAgencyOutcome::RateLimited { count },
      None => InsertAgencyOutcome::Inserted(agency),
    })
  }

  async fn get_agency(&self, id: Uuid) -> Result<Option<Agency>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAgency> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM agencies WHERE agency_id = ?1",
                RawAgency::COLUMNS
              ),
              rusqlite::params![id_str],
              RawAgency::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAgency::into_agency).transpose()
  }

  async fn list_agencies(&self, query: &AgencyQuery) -> Result<Vec<Agency>> {
    // Build WHERE clause dynamically; every bound value is a string.
    let mut conds: Vec<String> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    let filters = [
      ("user_id", query.user_id.map(encode_uuid)),
      ("lawyer_id", query.lawyer_id.map(encode_uuid)),
      ("representative_id", query.representative_id.map(encode_uuid)),
      ("status", query.status.map(encode_enum::<AgencyStatus>)),
    ];
    for (column, value) in filters {
      if let Some(value) = value {
        args.push(value);
        conds.push(format!("{column} = ?{}", args.len()));
      }
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    let raws: Vec<RawAgency> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM agencies {where_clause} ORDER BY created_at DESC",
          RawAgency::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args.iter()), RawAgency::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAgency::into_agency).collect()
  }

  async fn commit_agency(&self, commit: AgencyCommit) -> Result<CommitOutcome<Agency>> {
    let expected = commit.expected_version;
    let mut agency = commit.agency;
    agency.version = expected + 1;

    let raw = RawAgency::from_agency(&agency)?;
    let notes: Vec<RawNotification> = commit
      .notifications
      .iter()
      .map(RawNotification::from_notification)
      .collect();

    let guarded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(column) = agency_number_clash(&tx, &raw)? {
          return Ok(Guarded::Duplicate(column));
        }

        let changed = tx.execute(
          "UPDATE agencies SET
             sequential_number = ?2,
             record_number     = ?3,
             representative_id = ?4,
             kind              = ?5,
             authorizations    = ?6,
             exceptions        = ?7,
             place_of_issue    = ?8,
             status            = ?9,
             is_active         = ?10,
             version           = ?11,
             updated_at        = ?12
           WHERE agency_id = ?1 AND version = ?13",
          rusqlite::params![
            raw.agency_id,
            raw.sequential_number,
            raw.record_number,
            raw.representative_id,
            raw.kind,
            raw.authorizations,
            raw.exceptions,
            raw.place_of_issue,
            raw.status,
            raw.is_active,
            raw.version,
            raw.updated_at,
            expected,
          ],
        )?;
        if changed == 0 {
          return Ok(Guarded::Stale);
        }

        insert_notifications(&tx, &notes)?;
        tx.commit()?;
        Ok(Guarded::Written)
      })
      .await?;

    Ok(guarded.into_outcome(agency))
  }

  // ── Issues ────────────────────────────────────────────────────────────────

  async fn insert_issue(&self, issue: Issue) -> Result<CommitOutcome<Issue>> {
    let raw = RawIssue::from_issue(&issue);
    let agency_id = issue.agency_id;

    let guarded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !agency_in_force(&tx, &raw.agency_id)? {
          return Ok(Guarded::AgencyInactive(agency_id));
        }
        if let Some(column) = issue_number_clash(&tx, &raw)? {
          return Ok(Guarded::Duplicate(column));
        }

        tx.execute(
          &format!(
            "INSERT INTO issues ({}) VALUES
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            RawIssue::COLUMNS
          ),
          rusqlite::params![
            raw.issue_id,
            raw.agency_id,
            raw.lawyer_id,
            raw.base_number,
            raw.record_number,
            raw.court_name,
            raw.kind,
            raw.start_date,
            raw.end_date,
            raw.status,
            raw.estimated_cost,
            raw.is_active,
            raw.success_rate,
            raw.version,
            raw.created_at,
            raw.updated_at,
          ],
        )?;
        tx.commit()?;
        Ok(Guarded::Written)
      })
      .await?;

    Ok(guarded.into_outcome(issue))
  }

  async fn get_issue(&self, id: Uuid) -> Result<Option<Issue>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawIssue> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM issues WHERE issue_id = ?1", RawIssue::COLUMNS),
              rusqlite::params![id_str],
              RawIssue::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIssue::into_issue).transpose()
  }

  async fn list_issues(
    &self,
    lawyer_id: Uuid,
    agency_id: Option<Uuid>,
  ) -> Result<Vec<Issue>> {
    let lawyer_str = encode_uuid(lawyer_id);
    let agency_str = agency_id.map(encode_uuid);

    let raws: Vec<RawIssue> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM issues
           WHERE lawyer_id = ?1 AND (?2 IS NULL OR agency_id = ?2)
           ORDER BY created_at DESC",
          RawIssue::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![lawyer_str, agency_str], RawIssue::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIssue::into_issue).collect()
  }

  async fn update_issue(
    &self,
    issue: Issue,
    expected_version: i64,
    require_in_force: bool,
  ) -> Result<CommitOutcome<Issue>> {
    let mut issue = issue;
    issue.version = expected_version + 1;
    let raw = RawIssue::from_issue(&issue);
    let agency_id = issue.agency_id;

    let guarded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if require_in_force && !agency_in_force(&tx, &raw.agency_id)? {
          return Ok(Guarded::AgencyInactive(agency_id));
        }
        let changed = tx.execute(
          "UPDATE issues SET
             court_name     = ?2,
             kind           = ?3,
             end_date       = ?4,
             status         = ?5,
             estimated_cost = ?6,
             is_active      = ?7,
             success_rate   = ?8,
             version        = ?9,
             updated_at     = ?10
           WHERE issue_id = ?1 AND version = ?11",
          rusqlite::params![
            raw.issue_id,
            raw.court_name,
            raw.kind,
            raw.end_date,
            raw.status,
            raw.estimated_cost,
            raw.is_active,
            raw.success_rate,
            raw.version,
            raw.updated_at,
            expected_version,
          ],
        )?;
        if changed == 0 {
          return Ok(Guarded::Stale);
        }
        tx.commit()?;
        Ok(Guarded::Written)
      })
      .await?;

    Ok(guarded.into_outcome(issue))
  }

  async fn delete_issue(&self, issue: &Issue) -> Result<CommitOutcome<()>> {
    let id_str = encode_uuid(issue.id);
    let agency_str = encode_uuid(issue.agency_id);
    let agency_id = issue.agency_id;
    let version = issue.version;

    let guarded = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !agency_in_force(&tx, &agency_str)? {
          return Ok(Guarded::AgencyInactive(agency_id));
        }
        let n = tx.execute(
          "DELETE FROM issues WHERE issue_id = ?1 AND version = ?2",
          rusqlite::params![id_str, version],
        )?;
        if n == 0 {
          return Ok(Guarded::Stale);
        }
        tx.commit()?;
        Ok(Guarded::Written)
      })
      .await?;

    Ok(guarded.into_outcome(()))
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn notifications_for(&self, recipient: ActorRef) -> Result<Vec<Notification>> {
    let kind_str = encode_enum(recipient.kind);
    let id_str   = encode_uuid(recipient.id);

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM notifications
           WHERE recipient_kind = ?1 AND recipient_id = ?2
           ORDER BY created_at DESC, rowid DESC",
          RawNotification::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str, id_str], RawNotification::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_notification).collect()
  }

  // ── Token denylist ────────────────────────────────────────────────────────

  async fn revoke_token(&self, jti: Uuid, expires_at: DateTime<Utc>) -> Result<bool> {
    let jti_str = encode_uuid(jti);
    let exp_str = encode_dt(expires_at);
    let now_str = encode_dt(Utc::now());

    let revoked = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Entries past their expiry can no longer be presented anyway.
        tx.execute(
          "DELETE FROM revoked_tokens WHERE expires_at < ?1",
          rusqlite::params![now_str],
        )?;
        let inserted = tx.execute(
          "INSERT OR IGNORE INTO revoked_tokens (jti, expires_at) VALUES (?1, ?2)",
          rusqlite::params![jti_str, exp_str],
        )?;
        tx.commit()?;
        Ok(inserted == 1)
      })
      .await?;

    Ok(revoked)
  }

  async fn is_token_revoked(&self, jti: Uuid) -> Result<bool> {
    let jti_str = encode_uuid(jti);

    let revoked = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM revoked_tokens WHERE jti = ?1",
              rusqlite::params![jti_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(revoked)
  }
}
