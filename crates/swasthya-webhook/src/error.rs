//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("xml error: {0}")]
  Xml(String),
  /// The message pipeline could not produce a reply.
  #[error("pipeline error: {0}")]
  Pipeline(#[from] swasthya_core::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Xml(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
      // The chat provider only needs to know the hook failed.
      Error::Pipeline(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response(),
    }
  }
}
