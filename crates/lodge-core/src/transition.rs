//! Reservation lifecycle transitions driven by external collaborators
//! (payment gateway callbacks, front desk, administrators).
//!
//! ```text
//! pending   --payment_succeeded--> confirmed   (payment: paid)
//! pending   --payment_failed-----> cancelled   (payment: failed)
//! pending   --cancel-------------> cancelled
//! confirmed --complete-----------> completed
//! pending | confirmed --clear_for_rebooking--> same status, override set
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  reservation::{PaymentStatus, Reservation, ReservationStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
  PaymentSucceeded,
  PaymentFailed,
  Cancel,
  Complete,
  ClearForRebooking,
}

impl Transition {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::PaymentSucceeded => "payment_succeeded",
      Self::PaymentFailed => "payment_failed",
      Self::Cancel => "cancel",
      Self::Complete => "complete",
      Self::ClearForRebooking => "clear_for_rebooking",
    }
  }

  /// Compute the reservation that results from applying `self`, or reject.
  pub fn apply(self, current: &Reservation, now: DateTime<Utc>) -> Result<Reservation> {
    use ReservationStatus::{Cancelled, Completed, Confirmed, Pending};

    let reject = || Error::InvalidTransition {
      reservation_id: current.reservation_id,
      transition:     self,
      state:          describe(current),
    };

    if current.cleared_for_rebooking {
      return Err(reject());
    }

    let mut next = current.clone();
    match (self, current.status) {
      (Self::PaymentSucceeded, Pending) => {
        next.status = Confirmed;
        next.payment_status = PaymentStatus::Paid;
      }
      (Self::PaymentFailed, Pending) => {
        next.status = Cancelled;
        next.payment_status = PaymentStatus::Failed;
      }
      (Self::Cancel, Pending) => next.status = Cancelled,
      (Self::Complete, Confirmed) => next.status = Completed,
      (Self::ClearForRebooking, Pending | Confirmed) => {
        next.cleared_for_rebooking = true;
      }
      _ => return Err(reject()),
    }
    next.updated_at = now;
    Ok(next)
  }
}

impl fmt::Display for Transition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

fn describe(r: &Reservation) -> String {
  let mut s = format!("{} (payment {})", r.status, r.payment_status);
  if r.cleared_for_rebooking {
    s.push_str(", cleared for rebooking");
  }
  s
}
