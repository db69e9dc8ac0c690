//! Error types for `lodge-core`.
//!
//! Every variant names the rule that failed and, where one is involved, the
//! room it failed for.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  reservation::{BookingRef, Reservation},
  resource::ResourceId,
  transition::Transition,
};

#[derive(Debug, Error)]
pub enum Error {
  // ── Validation ────────────────────────────────────────────────────────────
  #[error("{field}: {reason}")]
  InvalidDate { field: &'static str, reason: String },

  #[error("check-out {check_out} must be after check-in {check_in}")]
  InvalidInterval {
    check_in:  NaiveDate,
    check_out: NaiveDate,
  },

  #[error("lookahead of {days} days is out of range (1..={max})")]
  InvalidWindow { days: u32, max: u32 },

  #[error("a booking must select at least one room")]
  EmptySelection,

  #[error("room {0} is selected more than once")]
  DuplicateSelection(ResourceId),

  #[error("room {resource_id}: {reason}")]
  InvalidOccupancy {
    resource_id: ResourceId,
    reason:      String,
  },

  #[error("invalid guest details: {0}")]
  InvalidGuest(String),

  #[error("invalid room definition: {0}")]
  InvalidResource(String),

  // ── Lookup ────────────────────────────────────────────────────────────────
  #[error("room {0} not found")]
  ResourceNotFound(ResourceId),

  #[error("room {0} already exists")]
  ResourceExists(ResourceId),

  #[error("room {0} is retired and cannot be booked")]
  ResourceInactive(ResourceId),

  #[error("reservation {0} not found")]
  ReservationNotFound(Uuid),

  #[error("booking {0} not found")]
  BookingNotFound(BookingRef),

  // ── Conflict ──────────────────────────────────────────────────────────────
  #[error(
    "room {} is unavailable for the requested stay ({} conflicting reservation(s))",
    .resource_id,
    .conflicts.len()
  )]
  Conflict {
    resource_id: ResourceId,
    conflicts:   Vec<Reservation>,
  },

  // ── Lifecycle ─────────────────────────────────────────────────────────────
  #[error("reservation {reservation_id}: cannot apply {transition} while {state}")]
  InvalidTransition {
    reservation_id: Uuid,
    transition:     Transition,
    state:          String,
  },

  // ── Persistence ───────────────────────────────────────────────────────────
  #[error("persistence failure{}: {}", room_suffix(.resource_id), .reason)]
  Persistence {
    resource_id: Option<ResourceId>,
    reason:      String,
  },
}

fn room_suffix(resource_id: &Option<ResourceId>) -> String {
  resource_id
    .as_ref()
    .map(|id| format!(" for room {id}"))
    .unwrap_or_default()
}

impl Error {
  /// The rule that rejected the request.
  pub fn rule(&self) -> &'static str {
    match self {
      Self::InvalidDate { .. } | Self::InvalidInterval { .. } | Self::InvalidWindow { .. } => {
        "interval"
      }
      Self::EmptySelection | Self::DuplicateSelection(_) => "selection",
      Self::InvalidOccupancy { .. } => "occupancy",
      Self::InvalidGuest(_) => "guest",
      Self::InvalidResource(_) | Self::ResourceExists(_) => "resource",
      Self::ResourceNotFound(_)
      | Self::ReservationNotFound(_)
      | Self::BookingNotFound(_) => "not_found",
      Self::ResourceInactive(_) => "inactive",
      Self::Conflict { .. } => "conflict",
      Self::InvalidTransition { .. } => "transition",
      Self::Persistence { .. } => "persistence",
    }
  }

  /// The room the failure concerns, if any.
  pub fn resource_id(&self) -> Option<&ResourceId> {
    match self {
      Self::DuplicateSelection(id)
      | Self::ResourceNotFound(id)
      | Self::ResourceExists(id)
      | Self::ResourceInactive(id) => Some(id),
      Self::InvalidOccupancy { resource_id, .. }
      | Self::Conflict { resource_id, .. } => Some(resource_id),
      Self::Persistence { resource_id, .. } => resource_id.as_ref(),
      _ => None,
    }
  }

  /// Conflicting reservations, for [`Error::Conflict`].
  pub fn conflicts(&self) -> &[Reservation] {
    match self {
      Self::Conflict { conflicts, .. } => conflicts,
      _ => &[],
    }
  }

  pub fn persistence(resource_id: Option<ResourceId>, reason: impl ToString) -> Self {
    Self::Persistence { resource_id, reason: reason.to_string() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
