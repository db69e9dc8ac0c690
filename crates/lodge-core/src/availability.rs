//! The overlap checker: is a room free for a given stay?

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  interval::StayInterval,
  occupancy::active_in_window,
  reservation::Reservation,
  resource::ResourceId,
};

/// Verdict for one room and one requested stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
  pub resource_id: ResourceId,
  pub stay:        StayInterval,
  pub available:   bool,
  /// Active reservations overlapping `stay`; empty when `available`.
  pub conflicts:   Vec<Reservation>,
}

impl Availability {
  /// Turn an unavailable verdict into [`Error::Conflict`].
  pub fn into_result(self) -> Result<Self> {
    if self.available {
      Ok(self)
    } else {
      Err(Error::Conflict {
        resource_id: self.resource_id,
        conflicts:   self.conflicts,
      })
    }
  }
}

/// Test `stay` against `reservations`. Reservations for other rooms and
/// released reservations are ignored, so callers may pass a superset.
pub fn check(
  resource_id: &ResourceId,
  stay: &StayInterval,
  reservations: &[Reservation],
) -> Availability {
  let mut conflicts: Vec<Reservation> =
    active_in_window(reservations, resource_id, stay).cloned().collect();
  conflicts.sort_by_key(|r| r.stay.check_in());

  Availability {
    resource_id: resource_id.clone(),
    stay:        *stay,
    available:   conflicts.is_empty(),
    conflicts,
  }
}
