//! SQL schema for the Census SQLite store.
//!
//! Executed once at connection startup. Schema migrations are out of scope;
//! `PRAGMA user_version` records the layout this DDL produces.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS people (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL CHECK (name != ''),
    surname     TEXT    NOT NULL DEFAULT '',
    patronymic  TEXT    NOT NULL DEFAULT '',
    age         INTEGER NOT NULL DEFAULT 0,
    gender      TEXT    NOT NULL DEFAULT '',
    nationality TEXT    NOT NULL DEFAULT ''   -- ISO 3166-1 alpha-2
);

CREATE INDEX IF NOT EXISTS people_name_idx        ON people(name);
CREATE INDEX IF NOT EXISTS people_nationality_idx ON people(nationality);

PRAGMA user_version = 1;
";
