//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use lodge_core::Error;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Engine(#[from] Error),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

fn status_for(e: &Error) -> StatusCode {
  match e {
    Error::InvalidDate { .. }
    | Error::InvalidInterval { .. }
    | Error::InvalidWindow { .. }
    | Error::EmptySelection
    | Error::DuplicateSelection(_)
    | Error::InvalidOccupancy { .. }
    | Error::InvalidGuest(_)
    | Error::InvalidResource(_) => StatusCode::BAD_REQUEST,
    Error::ResourceNotFound(_)
    | Error::ReservationNotFound(_)
    | Error::BookingNotFound(_) => StatusCode::NOT_FOUND,
    Error::ResourceExists(_) | Error::Conflict { .. } | Error::InvalidTransition { .. } => {
      StatusCode::CONFLICT
    }
    Error::ResourceInactive(_) => StatusCode::UNPROCESSABLE_ENTITY,
    Error::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::BadRequest(m) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": m, "rule": "request", "resource_id": null }),
      ),
      ApiError::Engine(e) => {
        let status = status_for(e);
        if status.is_server_error() {
          error!(rule = e.rule(), "request failed: {e}");
        }
        let mut body = json!({
          "error": e.to_string(),
          "rule": e.rule(),
          "resource_id": e.resource_id(),
        });
        if let Error::Conflict { conflicts, .. } = e {
          body["conflicts"] = json!(conflicts);
        }
        (status, body)
      }
    };
    (status, Json(body)).into_response()
  }
}
