//! Error types for `swasthya-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The knowledge store could not answer. Fatal for the current request.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The translation service failed or timed out.
  #[error("translation unavailable: {0}")]
  Translation(String),
}

impl Error {
  /// Box a backend error as [`Error::Store`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
