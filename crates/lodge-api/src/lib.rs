//! JSON REST API for lodge.
//!
//! Exposes an axum [`Router`] backed by an [`Engine`] over any
//! [`lodge_core::store::BookingStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lodge_api::api_router(engine.clone()))
//! ```

pub mod availability;
pub mod bookings;
pub mod error;
pub mod extract;
pub mod reservations;
pub mod resources;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use lodge_core::{engine::Engine, store::BookingStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(engine: Arc<Engine<S>>) -> Router<()>
where
  S: BookingStore + 'static,
{
  Router::new()
    // Rooms
    .route("/resources", get(resources::list::<S>).post(resources::create::<S>))
    .route("/resources/{id}", get(resources::get_one::<S>))
    .route("/resources/{id}/active", post(resources::set_active::<S>))
    // Availability
    .route("/resources/{id}/availability", get(availability::for_resource::<S>))
    .route("/availability", get(availability::catalog::<S>))
    // Bookings
    .route("/bookings", post(bookings::create::<S>))
    .route("/bookings/{ref}", get(bookings::get_one::<S>))
    .route("/bookings/{ref}/transitions", post(bookings::transition::<S>))
    // Reservations
    .route("/reservations/{id}", get(reservations::get_one::<S>))
    .route("/reservations/{id}/transitions", post(reservations::transition::<S>))
    .with_state(engine)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use lodge_core::{engine::Engine, gaps::Lookahead};
  use lodge_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::api_router;

  async fn make_router() -> axum::Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(Engine::new(Arc::new(store), Lookahead::default())))
  }

  async fn send(router: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let body = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
  }

  fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
  }

  fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
  }

  fn booking(rooms: &[&str], check_in: &str, check_out: &str) -> Value {
    json!({
      "guest": { "name": "Ada Lovelace", "email": "ada@example.com" },
      "check_in": check_in,
      "check_out": check_out,
      "rooms": rooms
        .iter()
        .map(|r| json!({ "resource_id": r, "adults": 2, "bed_preference": "king" }))
        .collect::<Vec<_>>(),
    })
  }

  async fn with_rooms(rooms: &[&str]) -> axum::Router {
    let router = make_router().await;
    for code in rooms {
      let (status, _) = send(
        &router,
        post(
          "/resources",
          json!({ "resource_id": code, "name": format!("Room {code}"), "nightly_price_cents": 10000 }),
        ),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
    }
    router
  }

  #[tokio::test]
  async fn booking_flow_end_to_end() {
    let router = with_rooms(&["101", "102"]).await;

    let (status, body) =
      send(&router, post("/bookings", booking(&["101", "102"], "2024-06-10", "2024-06-12"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total_cents"], 40000);
    let booking_ref = body["booking_ref"].as_str().unwrap().to_owned();

    let (status, body) = send(&router, get(&format!("/bookings/{booking_ref}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    let reservation_id = body[0]["reservation_id"].as_str().unwrap().to_owned();

    let (status, body) = send(
      &router,
      post(
        &format!("/bookings/{booking_ref}/transitions"),
        json!({ "transition": "payment_succeeded" }),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1]["status"], "confirmed");

    let (status, body) = send(&router, get(&format!("/reservations/{reservation_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_status"], "paid");
  }

  #[tokio::test]
  async fn conflicting_booking_is_409_naming_the_room() {
    let router = with_rooms(&["101", "102"]).await;
    send(&router, post("/bookings", booking(&["102"], "2024-06-10", "2024-06-15"))).await;

    let (status, body) =
      send(&router, post("/bookings", booking(&["101", "102"], "2024-06-12", "2024-06-14"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["rule"], "conflict");
    assert_eq!(body["resource_id"], "102");
    assert_eq!(body["conflicts"].as_array().unwrap().len(), 1);

    let (_, body) = send(
      &router,
      get("/resources/101/availability?checkin=2024-06-12&checkout=2024-06-14"),
    )
    .await;
    assert_eq!(body["available"], true);
  }

  #[tokio::test]
  async fn availability_verdict_and_calendar() {
    let router = with_rooms(&["101"]).await;
    send(&router, post("/bookings", booking(&["101"], "2024-06-10", "2024-06-15"))).await;

    let (status, body) = send(
      &router,
      get("/resources/101/availability?checkin=2024-06-14&checkout=2024-06-16"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert_eq!(body["alternatives"][0]["start"], "2024-06-15");

    let (status, body) =
      send(&router, get("/resources/101/availability?start=2024-06-01&days=30")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["occupied_dates"].as_array().unwrap().len(), 5);
    assert_eq!(body["free_periods"].as_array().unwrap().len(), 2);

    let (status, body) = send(&router, get("/availability?checkin=2024-06-12&checkout=2024-06-13")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unavailable"][0]["resource"]["resource_id"], "101");
  }

  #[tokio::test]
  async fn validation_errors_are_400() {
    let router = with_rooms(&["101"]).await;

    let (status, body) =
      send(&router, post("/bookings", booking(&["101"], "2024-06-12", "2024-06-10"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "interval");

    let (status, body) =
      send(&router, post("/bookings", booking(&[], "2024-06-10", "2024-06-12"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "selection");

    let (status, _) =
      send(&router, get("/resources/101/availability?checkin=2024-06-12")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
      send(&router, get("/resources/101/availability?start=2024-06-01&days=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "interval");
  }

  #[tokio::test]
  async fn malformed_dates_are_400_with_a_rule() {
    let router = with_rooms(&["101"]).await;

    let (status, body) =
      send(&router, post("/bookings", booking(&["101"], "2024-13-40", "2024-06-12"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "interval");
    assert!(body["error"].as_str().unwrap().starts_with("check_in:"));
    assert_eq!(body["resource_id"], Value::Null);

    let mut no_check_in = booking(&["101"], "2024-06-10", "2024-06-12");
    no_check_in.as_object_mut().unwrap().remove("check_in");
    let (status, body) = send(&router, post("/bookings", no_check_in)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "interval");
    assert_eq!(body["error"], "check_in: is required");

    let (status, body) =
      send(&router, get("/availability?checkin=2024-13-01&checkout=2024-06-02")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "interval");

    let (status, body) =
      send(&router, get("/resources/101/availability?start=June&days=30")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "interval");

    // Shape errors outside the dates still answer with a JSON body.
    let (status, body) = send(&router, post("/bookings", json!({ "check_in": "2024-06-10" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "request");

    let (status, body) =
      send(&router, get("/resources/101/availability?start=2024-06-01&days=many")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "request");

    let (status, body) = send(&router, get("/reservations/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rule"], "request");
  }

  #[tokio::test]
  async fn missing_and_retired_rooms() {
    let router = with_rooms(&["101"]).await;

    let (status, body) = send(&router, get("/resources/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["rule"], "not_found");

    let (status, body) =
      send(&router, post("/resources/101/active", json!({ "active": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (status, body) =
      send(&router, post("/bookings", booking(&["101"], "2024-06-10", "2024-06-12"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["rule"], "inactive");

    let (_, body) = send(&router, get("/resources")).await;
    assert!(body.as_array().unwrap().is_empty());
    let (_, body) = send(&router, get("/resources?include_inactive=true")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn invalid_transition_is_409() {
    let router = with_rooms(&["101"]).await;
    let (_, body) =
      send(&router, post("/bookings", booking(&["101"], "2024-06-10", "2024-06-12"))).await;
    let id = body["reservations"][0]["reservation_id"].as_str().unwrap().to_owned();

    let (status, body) = send(
      &router,
      post(&format!("/reservations/{id}/transitions"), json!({ "transition": "complete" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["rule"], "transition");
  }
}
