//! [`Engine`] drives a [`BookingStore`] with the shared availability rules.
//!
//! Every caller (single-room lookups, the catalog search, booking submission)
//! goes through here, so the overlap and gap semantics are computed in one
//! place regardless of which interface asked.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  availability::{self, Availability},
  booking::{BookingConfirmation, BookingRequest},
  gaps::{self, Calendar, FreePeriod, Lookahead},
  interval::StayInterval,
  reservation::{BookingRef, Reservation},
  resource::{NewResource, Resource, ResourceId},
  store::BookingStore,
  transition::Transition,
};

// ─── Report types ────────────────────────────────────────────────────────────

/// A single-room verdict plus, when unavailable, the next free periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
  #[serde(flatten)]
  pub availability: Availability,
  /// Free periods from check-in onwards; empty when the room is available.
  pub alternatives: Vec<FreePeriod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableResource {
  pub resource:     Resource,
  pub conflicts:    Vec<Reservation>,
  pub alternatives: Vec<FreePeriod>,
}

/// The active catalog split by whether each room is free for a stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAvailability {
  pub stay:        StayInterval,
  pub available:   Vec<Resource>,
  pub unavailable: Vec<UnavailableResource>,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Holds no mutable state of its own; cloning the `Arc` around it is cheap.
pub struct Engine<S> {
  store:     Arc<S>,
  lookahead: Lookahead,
}

impl<S: BookingStore> Engine<S> {
  pub fn new(store: Arc<S>, lookahead: Lookahead) -> Self {
    Self { store, lookahead }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn lookahead(&self) -> Lookahead { self.lookahead }

  async fn require_resource(&self, id: &ResourceId) -> Result<Resource> {
    self
      .store
      .get_resource(id)
      .await
      .map_err(Into::into)?
      .ok_or_else(|| Error::ResourceNotFound(id.clone()))
  }

  /// The window searched for alternatives after a failed check.
  fn alternatives_window(&self, stay: &StayInterval) -> Result<StayInterval> {
    StayInterval::window(stay.check_in(), self.lookahead.after_conflict_days)
  }

  // ── Rooms ─────────────────────────────────────────────────────────────

  pub async fn add_resource(&self, input: NewResource) -> Result<Resource> {
    input.validate()?;
    let resource = self.store.add_resource(input).await.map_err(Into::into)?;
    info!(room = %resource.resource_id, "room registered");
    Ok(resource)
  }

  pub async fn resource(&self, id: &ResourceId) -> Result<Resource> {
    self.require_resource(id).await
  }

  pub async fn resources(&self, include_inactive: bool) -> Result<Vec<Resource>> {
    self.store.list_resources(include_inactive).await.map_err(Into::into)
  }

  pub async fn set_resource_active(
    &self,
    id: &ResourceId,
    active: bool,
  ) -> Result<Resource> {
    let resource = self
      .store
      .set_resource_active(id, active)
      .await
      .map_err(Into::into)?;
    info!(room = %id, active, "room activity changed");
    Ok(resource)
  }

  // ── Queries ───────────────────────────────────────────────────────────

  /// Overlap check for one room; unavailable verdicts carry alternatives.
  pub async fn check_availability(
    &self,
    id: &ResourceId,
    stay: StayInterval,
  ) -> Result<AvailabilityReport> {
    self.require_resource(id).await?;
    let search = self.alternatives_window(&stay)?;
    let reservations = self
      .store
      .reservations_for_resource(id, stay.hull(&search))
      .await
      .map_err(Into::into)?;

    let verdict = availability::check(id, &stay, &reservations);
    let alternatives = if verdict.available {
      Vec::new()
    } else {
      gaps::find_gaps(id, &search, &reservations)
    };
    debug!(
      room = %id,
      available = verdict.available,
      conflicts = verdict.conflicts.len(),
      "availability checked"
    );
    Ok(AvailabilityReport { availability: verdict, alternatives })
  }

  /// Occupied dates and free periods of one room over a lookahead window.
  /// `days` defaults to the direct lookahead.
  pub async fn calendar(
    &self,
    id: &ResourceId,
    start: NaiveDate,
    days: Option<u32>,
  ) -> Result<Calendar> {
    let window = StayInterval::window(start, days.unwrap_or(self.lookahead.direct_days))?;
    self.require_resource(id).await?;
    let reservations = self
      .store
      .reservations_for_resource(id, window)
      .await
      .map_err(Into::into)?;
    Ok(gaps::calendar(id, &window, &reservations))
  }

  /// Partition the active catalog for `stay`, attaching alternatives to
  /// every unavailable room.
  pub async fn catalog(&self, stay: StayInterval) -> Result<CatalogAvailability> {
    let search = self.alternatives_window(&stay)?;
    let resources = self.store.list_resources(false).await.map_err(Into::into)?;
    let reservations = self
      .store
      .reservations_in_window(stay.hull(&search))
      .await
      .map_err(Into::into)?;

    let mut available = Vec::new();
    let mut unavailable = Vec::new();
    for resource in resources {
      let verdict = availability::check(&resource.resource_id, &stay, &reservations);
      if verdict.available {
        available.push(resource);
      } else {
        let alternatives = gaps::find_gaps(&resource.resource_id, &search, &reservations);
        unavailable.push(UnavailableResource {
          resource,
          conflicts: verdict.conflicts,
          alternatives,
        });
      }
    }
    debug!(
      available = available.len(),
      unavailable = unavailable.len(),
      "catalog availability computed"
    );
    Ok(CatalogAvailability { stay, available, unavailable })
  }

  // ── Booking ───────────────────────────────────────────────────────────

  /// Validate and commit a booking. Nothing is written unless every
  /// selected room is secured.
  pub async fn book(&self, request: BookingRequest) -> Result<BookingConfirmation> {
    request.validate()?;
    let rooms = request.rooms.len();
    match self.store.commit_booking(request).await.map_err(Into::into) {
      Ok(confirmation) => {
        info!(
          booking = %confirmation.booking_ref,
          rooms,
          total_cents = confirmation.total_cents,
          "booking committed"
        );
        Ok(confirmation)
      }
      Err(e) => {
        warn!(
          rule = e.rule(),
          room = e.resource_id().map(ResourceId::as_str),
          "booking rejected: {e}"
        );
        Err(e)
      }
    }
  }

  pub async fn booking(&self, booking_ref: &BookingRef) -> Result<Vec<Reservation>> {
    let reservations = self
      .store
      .booking_reservations(booking_ref)
      .await
      .map_err(Into::into)?;
    if reservations.is_empty() {
      return Err(Error::BookingNotFound(booking_ref.clone()));
    }
    Ok(reservations)
  }

  pub async fn reservation(&self, id: Uuid) -> Result<Reservation> {
    self
      .store
      .get_reservation(id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ReservationNotFound(id))
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────

  pub async fn transition_reservation(
    &self,
    id: Uuid,
    transition: Transition,
  ) -> Result<Reservation> {
    let reservation = self
      .store
      .transition_reservation(id, transition)
      .await
      .map_err(Into::into)?;
    info!(reservation = %id, %transition, status = %reservation.status, "reservation transitioned");
    Ok(reservation)
  }

  pub async fn transition_booking(
    &self,
    booking_ref: &BookingRef,
    transition: Transition,
  ) -> Result<Vec<Reservation>> {
    let reservations = self
      .store
      .transition_booking(booking_ref, transition)
      .await
      .map_err(Into::into)?;
    info!(booking = %booking_ref, %transition, count = reservations.len(), "booking transitioned");
    Ok(reservations)
  }
}
