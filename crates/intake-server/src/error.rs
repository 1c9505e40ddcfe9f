//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No session, or a session that failed verification.
  #[error("unauthorized")]
  Unauthorized,
  /// A login attempt with the wrong username or password.
  #[error("invalid credentials")]
  InvalidCredentials,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("configuration error: {0}")]
  Config(String),
  #[error("crypto error: {0}")]
  Crypto(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })))
          .into_response()
      }
      Error::InvalidCredentials => (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Invalid credentials" })),
      )
        .into_response(),
      Error::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
      }
      e @ (Error::Config(_) | Error::Crypto(_)) => {
        tracing::error!(error = %e, "internal error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "An unexpected error occurred" })),
        )
          .into_response()
      }
    }
  }
}
