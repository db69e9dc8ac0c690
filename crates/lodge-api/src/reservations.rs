//! Handlers for `/reservations/{id}` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
};
use lodge_core::{
  engine::Engine,
  reservation::Reservation,
  store::BookingStore,
  transition::Transition,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
  pub transition: Transition,
}

/// `GET /reservations/{id}`
pub async fn get_one<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
  Ok(Json(engine.reservation(id).await?))
}

/// `POST /reservations/{id}/transitions`, body: `{"transition":"cancel"}`
pub async fn transition<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<TransitionBody>,
) -> Result<Json<Reservation>, ApiError> {
  Ok(Json(engine.transition_reservation(id, body.transition).await?))
}
