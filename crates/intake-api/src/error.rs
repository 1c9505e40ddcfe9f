//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use intake_core::validate::{FieldError, ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("payload too large: {0}")]
  PayloadTooLarge(String),

  #[error(transparent)]
  Validation(#[from] ValidationErrors),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("attachment error: {0}")]
  Attachment(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<FieldError> for ApiError {
  fn from(e: FieldError) -> Self { ApiError::Validation(e.into()) }
}

impl From<intake_core::Error> for ApiError {
  fn from(e: intake_core::Error) -> Self {
    use intake_core::Error as E;
    match e {
      E::LeadNotFound(id) => ApiError::NotFound(format!("lead {id} not found")),
      E::InvalidTransition { id, from, to } => {
        ApiError::Conflict(format!("lead {id} cannot move from {from} to {to}"))
      }
      E::Validation(v) => ApiError::Validation(v),
      E::MalformedInput(m) => ApiError::BadRequest(m),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Validation(errors) => {
        return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::PayloadTooLarge(m) => (StatusCode::PAYLOAD_TOO_LARGE, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Store(e) | ApiError::Attachment(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "An unexpected error occurred".to_owned(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
