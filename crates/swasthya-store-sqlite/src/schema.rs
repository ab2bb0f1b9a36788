//! SQL schema for the Swasthya SQLite store.
//!
//! Names in `diseases` and `symptoms` are canonical normalized tokens; every
//! partial match runs against them. `label` keeps the seeded spelling.

/// Connection-level settings; must run outside any transaction.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA user_version = 1;
";

/// Table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const TABLES: &str = "
CREATE TABLE IF NOT EXISTS diseases (
    disease_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    label       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS symptoms (
    symptom_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    label       TEXT NOT NULL
);

-- Duplicate links collapse on the primary key.
CREATE TABLE IF NOT EXISTS disease_symptoms (
    disease_id  INTEGER NOT NULL REFERENCES diseases(disease_id) ON DELETE CASCADE,
    symptom_id  INTEGER NOT NULL REFERENCES symptoms(symptom_id) ON DELETE CASCADE,
    PRIMARY KEY (disease_id, symptom_id)
);

CREATE TABLE IF NOT EXISTS preventions (
    prevention_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    disease_id      INTEGER NOT NULL REFERENCES diseases(disease_id) ON DELETE CASCADE,
    prevention_text TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cases (
    case_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    disease_id  INTEGER NOT NULL REFERENCES diseases(disease_id) ON DELETE CASCADE,
    case_date   TEXT NOT NULL,      -- ISO 8601 calendar date
    num_cases   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS preventions_disease_idx ON preventions(disease_id);
CREATE INDEX IF NOT EXISTS cases_date_idx          ON cases(case_date);
";

/// Drops every table, children first, so seeding starts from scratch.
pub const RESET: &str = "
DROP TABLE IF EXISTS cases;
DROP TABLE IF EXISTS disease_symptoms;
DROP TABLE IF EXISTS preventions;
DROP TABLE IF EXISTS symptoms;
DROP TABLE IF EXISTS diseases;
";
