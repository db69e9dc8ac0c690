//! Handlers for `/bookings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/bookings` | Commit a booking; 201 with the confirmation |
//! | `GET`  | `/bookings/{ref}` | Reservations sharing the reference |
//! | `POST` | `/bookings/{ref}/transitions` | Body: `{"transition":"payment_succeeded"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use lodge_core::{
  booking::{BookingRequest, RoomSelection},
  engine::Engine,
  interval::{StayInterval, parse_date},
  reservation::{BookingRef, GuestInfo, Reservation},
  store::BookingStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath},
  reservations::TransitionBody,
};

/// Submission body. Dates are taken flat and raw so a missing, malformed or
/// reversed one is reported as an interval error rather than a body
/// rejection.
#[derive(Debug, Deserialize)]
pub struct BookingBody {
  pub guest:     GuestInfo,
  pub check_in:  Option<String>,
  pub check_out: Option<String>,
  pub rooms:     Vec<RoomSelection>,
}

/// `POST /bookings`
pub async fn create<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiJson(body): ApiJson<BookingBody>,
) -> Result<impl IntoResponse, ApiError> {
  let check_in = parse_date("check_in", body.check_in.as_deref())?;
  let check_out = parse_date("check_out", body.check_out.as_deref())?;
  let request = BookingRequest {
    guest: body.guest,
    stay:  StayInterval::new(check_in, check_out)?,
    rooms: body.rooms,
  };
  let confirmation = engine.book(request).await?;
  Ok((StatusCode::CREATED, Json(confirmation)))
}

/// `GET /bookings/{ref}`
pub async fn get_one<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiPath(booking_ref): ApiPath<BookingRef>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
  Ok(Json(engine.booking(&booking_ref).await?))
}

/// `POST /bookings/{ref}/transitions`
pub async fn transition<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiPath(booking_ref): ApiPath<BookingRef>,
  ApiJson(body): ApiJson<TransitionBody>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
  Ok(Json(engine.transition_booking(&booking_ref, body.transition).await?))
}
