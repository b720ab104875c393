//! SQL schema for the Wakala SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One table for every authenticatable kind; the kind is part of the key.
CREATE TABLE IF NOT EXISTS actors (
    actor_id      TEXT NOT NULL,
    kind          TEXT NOT NULL,   -- 'user' | 'lawyer' | 'representative'
    name          TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL,
    PRIMARY KEY (kind, actor_id),
    UNIQUE (kind, email)
);

-- Exactly one role per actor, removed together with it.
CREATE TABLE IF NOT EXISTS roles (
    actor_kind TEXT NOT NULL,
    actor_id   TEXT NOT NULL,
    name       TEXT NOT NULL,      -- 'user' | 'employee' | 'admin' | 'lawyer' | 'representative'
    PRIMARY KEY (actor_kind, actor_id),
    FOREIGN KEY (actor_kind, actor_id)
        REFERENCES actors(kind, actor_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS authorizations (
    authorization_id TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    created_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS agencies (
    agency_id         TEXT PRIMARY KEY,
    sequential_number TEXT UNIQUE,     -- NULL until approval
    record_number     TEXT UNIQUE,     -- NULL until approval
    user_id           TEXT NOT NULL,
    lawyer_id         TEXT NOT NULL,
    representative_id TEXT,
    cause             TEXT NOT NULL,
    kind              TEXT,            -- 'public' | 'private' | 'legitimacy'
    authorizations    TEXT NOT NULL DEFAULT '[]',
    exceptions        TEXT,
    place_of_issue    TEXT,
    status            TEXT NOT NULL DEFAULT 'pending',
    is_active         INTEGER NOT NULL DEFAULT 0,
    version           INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,
    created_on        TEXT NOT NULL,   -- UTC calendar day, for the daily limit
    updated_at        TEXT NOT NULL,
    CHECK (is_active = 0 OR status = 'approved')
);

CREATE TABLE IF NOT EXISTS issues (
    issue_id       TEXT PRIMARY KEY,
    agency_id      TEXT NOT NULL REFERENCES agencies(agency_id),
    lawyer_id      TEXT NOT NULL,
    base_number    TEXT NOT NULL UNIQUE,
    record_number  TEXT NOT NULL UNIQUE,
    court_name     TEXT NOT NULL,
    kind           TEXT NOT NULL,
    start_date     TEXT NOT NULL,
    end_date       TEXT,
    status         TEXT NOT NULL,
    estimated_cost REAL NOT NULL,
    is_active      INTEGER NOT NULL DEFAULT 1,
    success_rate   INTEGER,
    version        INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    CHECK (end_date IS NULL OR end_date > start_date),
    CHECK (success_rate IS NULL OR success_rate BETWEEN 0 AND 100)
);

-- Notifications are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    recipient_kind  TEXT NOT NULL,
    recipient_id    TEXT NOT NULL,
    kind            TEXT NOT NULL,
    agency_id       TEXT NOT NULL REFERENCES agencies(agency_id),
    sender_name     TEXT NOT NULL,
    recipient_name  TEXT NOT NULL,
    message         TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS revoked_tokens (
    jti        TEXT PRIMARY KEY,
    expires_at TEXT NOT NULL
);

-- Approval numbers are write-once and status never moves back to pending.
CREATE TRIGGER IF NOT EXISTS agencies_numbers_immutable
BEFORE UPDATE OF sequential_number, record_number ON agencies
WHEN (OLD.sequential_number IS NOT NULL
      AND NEW.sequential_number IS NOT OLD.sequential_number)
  OR (OLD.record_number IS NOT NULL
      AND NEW.record_number IS NOT OLD.record_number)
BEGIN
    SELECT RAISE(ABORT, 'agency numbers are immutable');
END;

CREATE TRIGGER IF NOT EXISTS agencies_status_forward_only
BEFORE UPDATE OF status ON agencies
WHEN OLD.status != 'pending' AND NEW.status != OLD.status
BEGIN
    SELECT RAISE(ABORT, 'agency status only moves forward');
END;

CREATE INDEX IF NOT EXISTS agencies_daily_idx      ON agencies(user_id, lawyer_id, created_on);
CREATE INDEX IF NOT EXISTS agencies_lawyer_idx     ON agencies(lawyer_id);
CREATE INDEX IF NOT EXISTS agencies_rep_idx        ON agencies(representative_id);
CREATE INDEX IF NOT EXISTS issues_lawyer_idx       ON issues(lawyer_id, agency_id);
CREATE INDEX IF NOT EXISTS notifications_recipient ON notifications(recipient_kind, recipient_id);

PRAGMA user_version = 1;
";
