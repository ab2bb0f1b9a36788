//! Error type for `swasthya-translate`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No endpoint is configured.
  #[error("translation is disabled")]
  Disabled,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("translation service returned status {0}")]
  Status(u16),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
