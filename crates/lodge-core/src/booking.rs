//! Booking requests and the per-room step of the commit protocol.
//!
//! A store commits a booking by walking [`BookingRequest::rooms`] in order
//! and calling [`secure_room`] for each one while holding its write lock. The
//! first room that fails aborts the whole booking; the store must then roll
//! back every reservation it already wrote for the booking reference.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  availability,
  interval::StayInterval,
  reservation::{
    BookingRef, GuestInfo, Party, PaymentStatus, Reservation, ReservationStatus,
  },
  resource::{Resource, ResourceId},
};

/// Most guests a single room selection may carry.
pub const MAX_GUESTS_PER_ROOM: u8 = 8;

// ─── Request ─────────────────────────────────────────────────────────────────

/// One room the guest wants, with who will stay in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSelection {
  pub resource_id: ResourceId,
  #[serde(flatten)]
  pub party:       Party,
}

/// Everything needed to commit a booking. Passed explicitly; the engine
/// reads no ambient request or session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
  pub guest: GuestInfo,
  pub stay:  StayInterval,
  /// Processed in order; the first room that cannot be secured is reported.
  pub rooms: Vec<RoomSelection>,
}

impl BookingRequest {
  /// Synchronous checks done before any store access.
  pub fn validate(&self) -> Result<()> {
    if self.guest.name.trim().is_empty() {
      return Err(Error::InvalidGuest("guest name is required".into()));
    }
    if self.guest.email.trim().is_empty() || !self.guest.email.contains('@') {
      return Err(Error::InvalidGuest(format!(
        "{:?} is not a usable email address",
        self.guest.email
      )));
    }
    if self.rooms.is_empty() {
      return Err(Error::EmptySelection);
    }

    let mut seen = HashSet::new();
    for room in &self.rooms {
      if !seen.insert(&room.resource_id) {
        return Err(Error::DuplicateSelection(room.resource_id.clone()));
      }
      let party = &room.party;
      if party.adults == 0 {
        return Err(Error::InvalidOccupancy {
          resource_id: room.resource_id.clone(),
          reason:      "at least one adult must stay in each room".into(),
        });
      }
      if party.adults.saturating_add(party.children) > MAX_GUESTS_PER_ROOM {
        return Err(Error::InvalidOccupancy {
          resource_id: room.resource_id.clone(),
          reason:      format!("no more than {MAX_GUESTS_PER_ROOM} guests per room"),
        });
      }
    }
    Ok(())
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// A committed booking, handed on to payment collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
  pub booking_ref:  BookingRef,
  pub stay:         StayInterval,
  /// One per selected room, in request order.
  pub reservations: Vec<Reservation>,
  pub total_cents:  i64,
}

impl BookingConfirmation {
  pub fn new(
    booking_ref: BookingRef,
    stay: StayInterval,
    reservations: Vec<Reservation>,
  ) -> Self {
    let total_cents = reservations
      .iter()
      .map(|r| r.quoted_total_cents)
      .fold(0i64, i64::saturating_add);
    Self { booking_ref, stay, reservations, total_cents }
  }
}

// ─── Per-room step ───────────────────────────────────────────────────────────

/// Check one room against the reservations the store currently holds for it
/// and, if free, build the new pending reservation.
///
/// `existing` must reflect the store under the same lock that will cover the
/// insert; otherwise two concurrent bookings can both pass.
pub fn secure_room(
  booking_ref: &BookingRef,
  request: &BookingRequest,
  selection: &RoomSelection,
  resource: &Resource,
  existing: &[Reservation],
  now: DateTime<Utc>,
) -> Result<Reservation> {
  if !resource.active {
    return Err(Error::ResourceInactive(resource.resource_id.clone()));
  }

  availability::check(&resource.resource_id, &request.stay, existing).into_result()?;

  Ok(Reservation {
    reservation_id:        Uuid::new_v4(),
    booking_ref:           booking_ref.clone(),
    resource_id:           resource.resource_id.clone(),
    stay:                  request.stay,
    status:                ReservationStatus::Pending,
    payment_status:        PaymentStatus::Pending,
    cleared_for_rebooking: false,
    guest:                 request.guest.clone(),
    party:                 selection.party,
    quoted_total_cents:    resource.quote(request.stay.nights()),
    created_at:            now,
    updated_at:            now,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    fixtures::{guest, reservation, stay},
    reservation::BedPreference,
    resource::OccupancyStatus,
  };

  fn room(code: &str, price: i64) -> Resource {
    Resource {
      resource_id:         code.into(),
      name:                format!("Room {code}"),
      nightly_price_cents: price,
      active:              true,
      occupancy:           OccupancyStatus::Vacant,
      created_at:          Utc::now(),
    }
  }

  fn select(code: &str) -> RoomSelection {
    RoomSelection {
      resource_id: code.into(),
      party:       Party { adults: 2, children: 1, bed_preference: Some(BedPreference::King) },
    }
  }

  fn request(rooms: &[&str]) -> BookingRequest {
    BookingRequest {
      guest: guest(),
      stay:  stay("2024-06-10", "2024-06-13"),
      rooms: rooms.iter().map(|r| select(r)).collect(),
    }
  }

  #[test]
  fn validation_rejects_empty_and_duplicate_selections() {
    assert!(matches!(request(&[]).validate(), Err(Error::EmptySelection)));
    assert!(matches!(
      request(&["101", "102", "101"]).validate(),
      Err(Error::DuplicateSelection(id)) if id.as_str() == "101"
    ));
    assert!(request(&["101", "102"]).validate().is_ok());
  }

  #[test]
  fn validation_rejects_rooms_without_adults() {
    let mut req = request(&["101"]);
    req.rooms[0].party.adults = 0;
    let err = req.validate().unwrap_err();
    assert_eq!(err.rule(), "occupancy");
    assert_eq!(err.resource_id().map(ResourceId::as_str), Some("101"));
  }

  #[test]
  fn validation_rejects_missing_guest_details() {
    let mut req = request(&["101"]);
    req.guest.name = "  ".into();
    assert!(matches!(req.validate(), Err(Error::InvalidGuest(_))));

    let mut req = request(&["101"]);
    req.guest.email = "nobody".into();
    assert!(matches!(req.validate(), Err(Error::InvalidGuest(_))));
  }

  #[test]
  fn secure_room_builds_pending_reservation_with_quote() {
    let req = request(&["101"]);
    let booking_ref = BookingRef::generate();
    let r = secure_room(&booking_ref, &req, &req.rooms[0], &room("101", 12_500), &[], Utc::now())
      .unwrap();
    assert_eq!(r.status, ReservationStatus::Pending);
    assert_eq!(r.payment_status, PaymentStatus::Pending);
    assert_eq!(r.booking_ref, booking_ref);
    assert_eq!(r.quoted_total_cents, 37_500);
    assert_eq!(r.party.children, 1);
  }

  #[test]
  fn secure_room_reports_conflicts() {
    let req = request(&["101"]);
    let existing = vec![reservation("101", "2024-06-12", "2024-06-14")];
    let err = secure_room(
      &BookingRef::generate(),
      &req,
      &req.rooms[0],
      &room("101", 100),
      &existing,
      Utc::now(),
    )
    .unwrap_err();
    assert_eq!(err.rule(), "conflict");
    assert_eq!(err.conflicts().len(), 1);
  }

  #[test]
  fn secure_room_refuses_retired_rooms() {
    let req = request(&["101"]);
    let mut retired = room("101", 100);
    retired.active = false;
    let err = secure_room(&BookingRef::generate(), &req, &req.rooms[0], &retired, &[], Utc::now())
      .unwrap_err();
    assert!(matches!(err, Error::ResourceInactive(_)));
  }

  #[test]
  fn booking_refs_are_prefixed_and_distinct() {
    let a = BookingRef::generate();
    let b = BookingRef::generate();
    assert!(a.as_str().starts_with("BK-"));
    assert_eq!(a.as_str().len(), 13);
    assert_ne!(a, b);
  }

  #[test]
  fn confirmation_totals_quotes() {
    let mut a = reservation("101", "2024-06-10", "2024-06-12");
    a.quoted_total_cents = 200;
    let mut b = reservation("102", "2024-06-10", "2024-06-12");
    b.quoted_total_cents = 300;
    let c = BookingConfirmation::new(BookingRef::generate(), stay("2024-06-10", "2024-06-12"), vec![a, b]);
    assert_eq!(c.total_cents, 500);
  }
}
