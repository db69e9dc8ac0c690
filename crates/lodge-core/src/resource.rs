//! Resources, the bookable rooms.
//!
//! Rooms are created and retired by administrative collaborators; the engine
//! itself only reads them, apart from the best-effort occupancy-status writes
//! performed when a booking commits or a reservation changes state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── ResourceId ──────────────────────────────────────────────────────────────

/// The room code, e.g. `Deluxe101`.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
  pub fn new(code: impl Into<String>) -> Self { Self(code.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ResourceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ResourceId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for ResourceId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Occupancy status ────────────────────────────────────────────────────────

/// The room's live occupancy flag shown to front-desk staff. Set on a
/// best-effort basis when a booking commits and re-derived after each
/// transition, falling back to vacant once no active reservation holds the
/// room. Availability never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyStatus {
  #[default]
  Vacant,
  Occupied,
}

// ─── Resource ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
  pub resource_id:         ResourceId,
  pub name:                String,
  /// Nightly price in minor currency units.
  pub nightly_price_cents: i64,
  /// Retired rooms are hidden from the catalog and cannot be booked.
  pub active:              bool,
  pub occupancy:           OccupancyStatus,
  pub created_at:          DateTime<Utc>,
}

impl Resource {
  /// Price of `nights` nights in this room.
  pub fn quote(&self, nights: u32) -> i64 {
    self.nightly_price_cents.saturating_mul(i64::from(nights))
  }
}

/// Input to [`crate::store::BookingStore::add_resource`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResource {
  pub resource_id:         ResourceId,
  pub name:                String,
  pub nightly_price_cents: i64,
}

impl NewResource {
  pub fn validate(&self) -> Result<()> {
    if self.resource_id.as_str().trim().is_empty() {
      return Err(Error::InvalidResource("room code must not be empty".into()));
    }
    if self.name.trim().is_empty() {
      return Err(Error::InvalidResource(format!(
        "room {} must have a name",
        self.resource_id
      )));
    }
    if self.nightly_price_cents < 0 {
      return Err(Error::InvalidResource(format!(
        "room {} has a negative nightly price",
        self.resource_id
      )));
    }
    Ok(())
  }
}
