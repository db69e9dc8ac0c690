//! Availability queries.
//!
//! `GET /resources/{id}/availability` answers two questions depending on the
//! query string:
//!
//! - `?checkin=YYYY-MM-DD&checkout=YYYY-MM-DD`: can this room host the stay?
//!   Unavailable verdicts list the conflicts and the next free periods.
//! - `?start=YYYY-MM-DD&days=N` (both optional): occupied dates and free
//!   periods over a lookahead window starting today by default.
//!
//! `GET /availability?checkin=..&checkout=..` partitions the active catalog.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  response::{IntoResponse, Response},
};
use chrono::Utc;
use lodge_core::{
  engine::{CatalogAvailability, Engine},
  interval::{StayInterval, parse_date},
  resource::ResourceId,
  store::BookingStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{ApiPath, ApiQuery},
};

/// Dates stay raw until [`parse_date`] so a bad one is reported under the
/// `interval` rule with the parameter it came from.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityParams {
  pub checkin:  Option<String>,
  pub checkout: Option<String>,
  pub start:    Option<String>,
  pub days:     Option<u32>,
}

/// Both ends or neither; a lone end is a malformed request.
fn requested_stay(params: &AvailabilityParams) -> Result<Option<StayInterval>, ApiError> {
  match (params.checkin.as_deref(), params.checkout.as_deref()) {
    (Some(check_in), Some(check_out)) => {
      let check_in = parse_date("checkin", Some(check_in))?;
      let check_out = parse_date("checkout", Some(check_out))?;
      Ok(Some(StayInterval::new(check_in, check_out)?))
    }
    (None, None) => Ok(None),
    _ => Err(ApiError::BadRequest(
      "checkin and checkout must be given together".into(),
    )),
  }
}

/// `GET /resources/{id}/availability`
pub async fn for_resource<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiPath(id): ApiPath<ResourceId>,
  ApiQuery(params): ApiQuery<AvailabilityParams>,
) -> Result<Response, ApiError> {
  if let Some(stay) = requested_stay(&params)? {
    let report = engine.check_availability(&id, stay).await?;
    return Ok(Json(report).into_response());
  }

  let start = match params.start.as_deref() {
    Some(raw) => parse_date("start", Some(raw))?,
    None => Utc::now().date_naive(),
  };
  let calendar = engine.calendar(&id, start, params.days).await?;
  Ok(Json(calendar).into_response())
}

/// `GET /availability?checkin=..&checkout=..`
pub async fn catalog<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiQuery(params): ApiQuery<AvailabilityParams>,
) -> Result<Json<CatalogAvailability>, ApiError> {
  let stay = requested_stay(&params)?.ok_or_else(|| {
    ApiError::BadRequest("checkin and checkout are required".into())
  })?;
  Ok(Json(engine.catalog(stay).await?))
}
