//! Reservations: one room held for one stay.
//!
//! A reservation carries two status axes plus an administrative override:
//! the primary [`ReservationStatus`], the [`PaymentStatus`], and the
//! `cleared_for_rebooking` flag. Which combinations count toward occupancy is
//! decided in exactly one place, [`crate::occupancy`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{interval::StayInterval, resource::ResourceId};

// ─── BookingRef ──────────────────────────────────────────────────────────────

/// Groups the reservations created together for one guest transaction.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BookingRef(String);

impl BookingRef {
  /// A fresh reference of the form `BK-` + 10 upper-case hex digits.
  pub fn generate() -> Self {
    let hex = Uuid::new_v4().simple().to_string();
    Self(format!("BK-{}", hex[..10].to_ascii_uppercase()))
  }

  pub fn new(reference: impl Into<String>) -> Self { Self(reference.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for BookingRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Statuses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
  Pending,
  Confirmed,
  Cancelled,
  Completed,
}

impl ReservationStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Confirmed => "confirmed",
      Self::Cancelled => "cancelled",
      Self::Completed => "completed",
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Cancelled | Self::Completed)
  }
}

impl fmt::Display for ReservationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
  Pending,
  Paid,
  Failed,
}

impl PaymentStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Paid => "paid",
      Self::Failed => "failed",
    }
  }
}

impl fmt::Display for PaymentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Guest & party ───────────────────────────────────────────────────────────

/// Guest contact details. Opaque to the engine; stored and echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
  pub name:             String,
  pub email:            String,
  #[serde(default)]
  pub phone:            Option<String>,
  #[serde(default)]
  pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedPreference {
  King,
  Queen,
  Twin,
  Double,
}

impl BedPreference {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::King => "king",
      Self::Queen => "queen",
      Self::Twin => "twin",
      Self::Double => "double",
    }
  }
}

/// Who will stay in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
  pub adults:         u8,
  #[serde(default)]
  pub children:       u8,
  #[serde(default)]
  pub bed_preference: Option<BedPreference>,
}

// ─── Reservation ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
  pub reservation_id:        Uuid,
  pub booking_ref:           BookingRef,
  pub resource_id:           ResourceId,
  pub stay:                  StayInterval,
  pub status:                ReservationStatus,
  pub payment_status:        PaymentStatus,
  /// Administrative override that frees the room without touching `status`.
  pub cleared_for_rebooking: bool,
  pub guest:                 GuestInfo,
  pub party:                 Party,
  /// Price agreed at commit time, in minor currency units.
  pub quoted_total_cents:    i64,
  pub created_at:            DateTime<Utc>,
  pub updated_at:            DateTime<Utc>,
}
