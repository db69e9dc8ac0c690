//! The active-reservation filter.
//!
//! The overlap checker and the gap finder both take their notion of "who is
//! in the room" from here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::{
  interval::StayInterval,
  reservation::{PaymentStatus, Reservation, ReservationStatus},
  resource::ResourceId,
};

/// Why a reservation no longer holds its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Release {
  ClearedForRebooking,
  Cancelled,
  Completed,
  PaymentFailed,
}

impl Reservation {
  /// `None` while the reservation still occupies its room.
  ///
  /// The rebooking override is checked first: it frees the room whatever the
  /// primary status says.
  pub fn release(&self) -> Option<Release> {
    if self.cleared_for_rebooking {
      return Some(Release::ClearedForRebooking);
    }
    match self.status {
      ReservationStatus::Cancelled => return Some(Release::Cancelled),
      ReservationStatus::Completed => return Some(Release::Completed),
      ReservationStatus::Pending | ReservationStatus::Confirmed => {}
    }
    if self.payment_status == PaymentStatus::Failed {
      return Some(Release::PaymentFailed);
    }
    None
  }

  pub fn is_active(&self) -> bool { self.release().is_none() }
}

/// Active reservations of `resource_id` whose stay intersects `window`.
pub fn active_in_window<'a>(
  reservations: &'a [Reservation],
  resource_id: &'a ResourceId,
  window: &'a StayInterval,
) -> impl Iterator<Item = &'a Reservation> + 'a {
  reservations.iter().filter(move |r| {
    r.resource_id == *resource_id && r.is_active() && r.stay.overlaps(window)
  })
}
