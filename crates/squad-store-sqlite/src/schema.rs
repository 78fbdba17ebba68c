//! SQL schema for the Squad SQLite store.
//!
//! Executed once at connection startup. The schema version lives in
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per storage key. Values are opaque JSON documents or flags.
CREATE TABLE IF NOT EXISTS entries (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL     -- ISO 8601 UTC of the last write
);

PRAGMA user_version = 1;
";
