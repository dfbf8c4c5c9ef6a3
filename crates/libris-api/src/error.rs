//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use libris_core::{Error, Outcome};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A catalog operation failed; the HTTP status is picked from its
  /// [`Outcome`] class.
  #[error(transparent)]
  Catalog(#[from] Error),

  /// The request body was missing, null or not of the expected shape.
  #[error("invalid request body: {}", .0.body_text())]
  Body(#[from] JsonRejection),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    let outcome = match self {
      Self::Catalog(err) => err.outcome(),
      Self::Body(_) => Outcome::ValidationFailed,
    };
    match outcome {
      Outcome::NotFound => StatusCode::NOT_FOUND,
      Outcome::ValidationFailed => StatusCode::BAD_REQUEST,
      Outcome::Conflict => StatusCode::CONFLICT,
      Outcome::PersistenceFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "catalog operation failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
