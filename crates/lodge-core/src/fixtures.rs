//! Shared builders for unit tests.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  interval::StayInterval,
  reservation::{
    BookingRef, GuestInfo, Party, PaymentStatus, Reservation, ReservationStatus,
  },
};

pub fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

pub fn stay(check_in: &str, check_out: &str) -> StayInterval {
  StayInterval::new(d(check_in), d(check_out)).unwrap()
}

pub fn guest() -> GuestInfo {
  GuestInfo {
    name:             "Ada Lovelace".into(),
    email:            "ada@example.com".into(),
    phone:            None,
    special_requests: None,
  }
}

/// A pending/pending reservation of `room` for `[check_in, check_out)`.
pub fn reservation(room: &str, check_in: &str, check_out: &str) -> Reservation {
  Reservation {
    reservation_id:        Uuid::new_v4(),
    booking_ref:           BookingRef::new("BK-0000000001"),
    resource_id:           room.into(),
    stay:                  stay(check_in, check_out),
    status:                ReservationStatus::Pending,
    payment_status:        PaymentStatus::Pending,
    cleared_for_rebooking: false,
    guest:                 guest(),
    party:                 Party { adults: 2, children: 0, bed_preference: None },
    quoted_total_cents:    0,
    created_at:            Utc::now(),
    updated_at:            Utc::now(),
  }
}
