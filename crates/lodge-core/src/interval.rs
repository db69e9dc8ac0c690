//! Stay intervals, half-open ranges of calendar dates.
//!
//! A stay `[check_in, check_out)` occupies every night from `check_in` up to
//! but not including `check_out`: the departing guest vacates the room on the
//! check-out day, so another stay may begin on that same date.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Longest lookahead window accepted by the gap finder.
pub const MAX_WINDOW_DAYS: u32 = 731;

/// Parse a required `YYYY-MM-DD` date supplied under `field`.
pub fn parse_date(field: &'static str, raw: Option<&str>) -> Result<NaiveDate> {
  let raw = raw.ok_or_else(|| Error::InvalidDate { field, reason: "is required".into() })?;
  raw.parse::<NaiveDate>().map_err(|e| Error::InvalidDate {
    field,
    reason: format!("{raw:?} is not a calendar date ({e})"),
  })
}

// ─── StayInterval ────────────────────────────────────────────────────────────

/// A half-open interval of calendar dates. `check_in < check_out` always
/// holds; construction rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct StayInterval {
  check_in:  NaiveDate,
  check_out: NaiveDate,
}

#[derive(Deserialize)]
struct RawInterval {
  check_in:  NaiveDate,
  check_out: NaiveDate,
}

impl TryFrom<RawInterval> for StayInterval {
  type Error = Error;

  fn try_from(raw: RawInterval) -> Result<Self> {
    Self::new(raw.check_in, raw.check_out)
  }
}

impl StayInterval {
  pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self> {
    if check_in >= check_out {
      return Err(Error::InvalidInterval { check_in, check_out });
    }
    Ok(Self { check_in, check_out })
  }

  /// For callers that already guarantee `check_in < check_out`.
  pub(crate) fn from_ordered(check_in: NaiveDate, check_out: NaiveDate) -> Self {
    debug_assert!(check_in < check_out, "stay must end after it starts");
    Self { check_in, check_out }
  }

  /// A lookahead window of `days` days starting at `start`.
  pub fn window(start: NaiveDate, days: u32) -> Result<Self> {
    if days == 0 || days > MAX_WINDOW_DAYS {
      return Err(Error::InvalidWindow { days, max: MAX_WINDOW_DAYS });
    }
    let end = start
      .checked_add_days(Days::new(u64::from(days)))
      .ok_or(Error::InvalidWindow { days, max: MAX_WINDOW_DAYS })?;
    Self::new(start, end)
  }

  pub fn check_in(&self) -> NaiveDate { self.check_in }

  pub fn check_out(&self) -> NaiveDate { self.check_out }

  /// Number of occupied nights (equivalently, days covered).
  pub fn nights(&self) -> u32 {
    (self.check_out - self.check_in).num_days() as u32
  }

  /// `[a1, a2)` and `[b1, b2)` overlap iff `a1 < b2 && b1 < a2`.
  pub fn overlaps(&self, other: &StayInterval) -> bool {
    self.check_in < other.check_out && other.check_in < self.check_out
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.check_in <= date && date < self.check_out
  }

  /// The common part of two intervals, if they overlap.
  pub fn intersection(&self, other: &StayInterval) -> Option<StayInterval> {
    if !self.overlaps(other) {
      return None;
    }
    Some(StayInterval {
      check_in:  self.check_in.max(other.check_in),
      check_out: self.check_out.min(other.check_out),
    })
  }

  /// The smallest interval covering both `self` and `other`.
  pub fn hull(&self, other: &StayInterval) -> StayInterval {
    StayInterval {
      check_in:  self.check_in.min(other.check_in),
      check_out: self.check_out.max(other.check_out),
    }
  }

  /// Every occupied day, in order. The check-out day is not yielded.
  pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
    let end = self.check_out;
    self.check_in.iter_days().take_while(move |d| *d < end)
  }
}
