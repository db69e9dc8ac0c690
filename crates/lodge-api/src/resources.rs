//! Handlers for `/resources` endpoints (room administration).
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/resources` | Optional `?include_inactive=true` |
//! | `POST` | `/resources` | Body: `{"resource_id":"101","name":"..","nightly_price_cents":12000}` |
//! | `GET`  | `/resources/{id}` | 404 if not found |
//! | `POST` | `/resources/{id}/active` | Body: `{"active":false}` retires the room |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use lodge_core::{
  engine::Engine,
  resource::{NewResource, Resource, ResourceId},
  store::BookingStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub include_inactive: bool,
}

/// `GET /resources[?include_inactive=true]`
pub async fn list<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Resource>>, ApiError> {
  Ok(Json(engine.resources(params.include_inactive).await?))
}

/// `POST /resources`
pub async fn create<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiJson(body): ApiJson<NewResource>,
) -> Result<impl IntoResponse, ApiError> {
  let resource = engine.add_resource(body).await?;
  Ok((StatusCode::CREATED, Json(resource)))
}

/// `GET /resources/{id}`
pub async fn get_one<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiPath(id): ApiPath<ResourceId>,
) -> Result<Json<Resource>, ApiError> {
  Ok(Json(engine.resource(&id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ActiveBody {
  pub active: bool,
}

/// `POST /resources/{id}/active`
pub async fn set_active<S: BookingStore>(
  State(engine): State<Arc<Engine<S>>>,
  ApiPath(id): ApiPath<ResourceId>,
  ApiJson(body): ApiJson<ActiveBody>,
) -> Result<Json<Resource>, ApiError> {
  Ok(Json(engine.set_resource_active(&id, body.active).await?))
}
