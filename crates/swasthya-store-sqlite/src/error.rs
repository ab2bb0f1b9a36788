//! Error type for `swasthya-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// A stored count does not fit the domain type.
  #[error("corrupt row: {0}")]
  Corrupt(String),

  /// Seed data that would produce an empty or conflicting key.
  #[error("invalid dataset: {0}")]
  InvalidDataset(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
