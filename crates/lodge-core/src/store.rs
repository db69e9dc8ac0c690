//! The `BookingStore` trait: the persistence store holding rooms and
//! reservations.
//!
//! The trait is implemented by storage backends (e.g. `lodge-store-sqlite`).
//! Availability logic never lives in a backend: stores hand raw reservations
//! to [`crate::engine::Engine`], which applies the shared filter, overlap and
//! gap rules. The one exception is [`BookingStore::commit_booking`], which
//! must run [`crate::booking::secure_room`] under the store's own lock.

use std::future::Future;

use uuid::Uuid;

use crate::{
  booking::{BookingConfirmation, BookingRequest},
  interval::StayInterval,
  reservation::{BookingRef, Reservation},
  resource::{NewResource, Resource, ResourceId},
  transition::Transition,
};

/// Abstraction over a room/reservation store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Errors convert
/// into [`crate::Error`] so callers see one taxonomy whatever the backend.
pub trait BookingStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Rooms ─────────────────────────────────────────────────────────────

  /// Register a new room. Fails if the code is taken.
  fn add_resource(
    &self,
    input: NewResource,
  ) -> impl Future<Output = Result<Resource, Self::Error>> + Send + '_;

  fn get_resource<'a>(
    &'a self,
    id: &'a ResourceId,
  ) -> impl Future<Output = Result<Option<Resource>, Self::Error>> + Send + 'a;

  /// All rooms ordered by code; retired rooms only if `include_inactive`.
  fn list_resources(
    &self,
    include_inactive: bool,
  ) -> impl Future<Output = Result<Vec<Resource>, Self::Error>> + Send + '_;

  /// Retire (`false`) or reinstate (`true`) a room.
  fn set_resource_active<'a>(
    &'a self,
    id: &'a ResourceId,
    active: bool,
  ) -> impl Future<Output = Result<Resource, Self::Error>> + Send + 'a;

  // ── Reservations: reads ──────────────────────────────────────────────

  /// Every reservation of `id` whose stay intersects `window`, whatever its
  /// status. Filtering by status is the engine's job.
  fn reservations_for_resource<'a>(
    &'a self,
    id: &'a ResourceId,
    window: StayInterval,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + 'a;

  /// Every reservation, for any room, whose stay intersects `window`.
  fn reservations_in_window(
    &self,
    window: StayInterval,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + '_;

  fn get_reservation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Reservation>, Self::Error>> + Send + '_;

  /// Reservations sharing `booking_ref`, in the order they were committed.
  fn booking_reservations<'a>(
    &'a self,
    booking_ref: &'a BookingRef,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + 'a;

  // ── Reservations: writes ─────────────────────────────────────────────

  /// Commit a validated booking atomically: every room is checked and
  /// inserted under one lock, and on any failure nothing is persisted.
  fn commit_booking(
    &self,
    request: BookingRequest,
  ) -> impl Future<Output = Result<BookingConfirmation, Self::Error>> + Send + '_;

  fn transition_reservation(
    &self,
    id: Uuid,
    transition: Transition,
  ) -> impl Future<Output = Result<Reservation, Self::Error>> + Send + '_;

  /// Apply `transition` to every reservation of a booking, all or nothing.
  fn transition_booking<'a>(
    &'a self,
    booking_ref: &'a BookingRef,
    transition: Transition,
  ) -> impl Future<Output = Result<Vec<Reservation>, Self::Error>> + Send + 'a;
}
