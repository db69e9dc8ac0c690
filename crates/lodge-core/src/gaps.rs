//! The gap finder: maximal free periods of one room within a lookahead
//! window.
//!
//! Occupied days are materialised into a set and the window is swept day by
//! day. Cost is linear in the window length plus the reserved days inside
//! it, which is fine for a hotel's worth of rooms and a few months of
//! lookahead.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  interval::StayInterval,
  occupancy::active_in_window,
  reservation::Reservation,
  resource::ResourceId,
};

/// Lookahead for direct single-room calendar queries.
pub const DEFAULT_DIRECT_LOOKAHEAD_DAYS: u32 = 30;
/// Lookahead when searching for alternatives after a failed check.
pub const DEFAULT_AFTER_CONFLICT_LOOKAHEAD_DAYS: u32 = 90;

// ─── Lookahead configuration ─────────────────────────────────────────────────

/// Window lengths used by the engine when the caller does not give one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lookahead {
  pub direct_days:         u32,
  pub after_conflict_days: u32,
}

impl Default for Lookahead {
  fn default() -> Self {
    Self {
      direct_days:         DEFAULT_DIRECT_LOOKAHEAD_DAYS,
      after_conflict_days: DEFAULT_AFTER_CONFLICT_LOOKAHEAD_DAYS,
    }
  }
}

// ─── Output types ────────────────────────────────────────────────────────────

/// A maximal run of free days `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreePeriod {
  pub start:  NaiveDate,
  /// First day that is occupied again, or the window end.
  pub end:    NaiveDate,
  pub length: u32,
}

impl FreePeriod {
  pub fn as_interval(&self) -> StayInterval {
    StayInterval::from_ordered(self.start, self.end)
  }
}

/// Occupied dates and free periods of one room over a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
  pub resource_id:    ResourceId,
  pub window:         StayInterval,
  pub occupied_dates: Vec<NaiveDate>,
  pub free_periods:   Vec<FreePeriod>,
}

// ─── Algorithm ───────────────────────────────────────────────────────────────

/// Every day inside `window` held by an active reservation of `resource_id`.
pub fn occupied_days(
  resource_id: &ResourceId,
  window: &StayInterval,
  reservations: &[Reservation],
) -> BTreeSet<NaiveDate> {
  active_in_window(reservations, resource_id, window)
    .filter_map(|r| r.stay.intersection(window))
    .flat_map(|clipped| clipped.days())
    .collect()
}

/// Sweep `window` against a set of occupied days.
pub fn gaps_between(
  window: &StayInterval,
  occupied: &BTreeSet<NaiveDate>,
) -> Vec<FreePeriod> {
  let end = window.check_out();
  let mut periods = Vec::new();
  let mut day = window.check_in();

  while day < end {
    if occupied.contains(&day) {
      day = day.succ_opt().unwrap_or(end);
      continue;
    }
    let start = day;
    while day < end && !occupied.contains(&day) {
      day = day.succ_opt().unwrap_or(end);
    }
    periods.push(FreePeriod {
      start,
      end: day,
      length: (day - start).num_days() as u32,
    });
  }

  periods
}

/// Maximal free periods of `resource_id` within `window`, by start date.
pub fn find_gaps(
  resource_id: &ResourceId,
  window: &StayInterval,
  reservations: &[Reservation],
) -> Vec<FreePeriod> {
  gaps_between(window, &occupied_days(resource_id, window, reservations))
}

pub fn calendar(
  resource_id: &ResourceId,
  window: &StayInterval,
  reservations: &[Reservation],
) -> Calendar {
  let occupied = occupied_days(resource_id, window, reservations);
  let free_periods = gaps_between(window, &occupied);
  Calendar {
    resource_id: resource_id.clone(),
    window: *window,
    occupied_dates: occupied.into_iter().collect(),
    free_periods,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    fixtures::{d, reservation, stay},
    reservation::ReservationStatus,
  };

  #[test]
  fn free_window_is_one_period() {
    let room = ResourceId::from("101");
    let window = stay("2024-06-01", "2024-06-11");
    let gaps = find_gaps(&room, &window, &[]);
    assert_eq!(gaps, vec![FreePeriod {
      start:  d("2024-06-01"),
      end:    d("2024-06-11"),
      length: 10,
    }]);
  }

  #[test]
  fn fully_booked_window_has_no_periods() {
    let room = ResourceId::from("101");
    let window = stay("2024-06-10", "2024-06-15");
    let existing = vec![reservation("101", "2024-06-01", "2024-06-30")];
    assert!(find_gaps(&room, &window, &existing).is_empty());
  }

  #[test]
  fn deluxe_room_ninety_day_lookahead() {
    let room = ResourceId::from("Deluxe101");
    let window = StayInterval::window(d("2024-06-01"), 90).unwrap();
    let existing = vec![reservation("Deluxe101", "2024-06-10", "2024-06-15")];

    let gaps = find_gaps(&room, &window, &existing);
    assert_eq!(gaps.len(), 2);
    assert_eq!(gaps[0].start, d("2024-06-01"));
    assert_eq!(gaps[0].end, d("2024-06-10"));
    assert_eq!(gaps[0].length, 9);
    assert_eq!(gaps[1].start, d("2024-06-15"));
    assert_eq!(gaps[1].end, window.check_out());
    assert!(gaps.iter().all(|g| !g.as_interval().overlaps(&stay("2024-06-10", "2024-06-15"))));
  }

  #[test]
  fn back_to_back_stays_leave_no_gap_between_them() {
    let room = ResourceId::from("101");
    let window = stay("2024-06-01", "2024-06-30");
    let existing = vec![
      reservation("101", "2024-06-05", "2024-06-10"),
      reservation("101", "2024-06-10", "2024-06-12"),
      reservation("101", "2024-06-20", "2024-06-21"),
    ];
    let gaps = find_gaps(&room, &window, &existing);
    let spans: Vec<_> = gaps.iter().map(|g| (g.start, g.end)).collect();
    assert_eq!(spans, vec![
      (d("2024-06-01"), d("2024-06-05")),
      (d("2024-06-12"), d("2024-06-20")),
      (d("2024-06-21"), d("2024-06-30")),
    ]);
  }

  #[test]
  fn reservations_straddling_window_edges_are_clipped() {
    let room = ResourceId::from("101");
    let window = stay("2024-06-10", "2024-06-20");
    let existing = vec![
      reservation("101", "2024-06-01", "2024-06-12"),
      reservation("101", "2024-06-18", "2024-07-02"),
    ];
    let cal = calendar(&room, &window, &existing);
    assert_eq!(cal.occupied_dates.first(), Some(&d("2024-06-10")));
    assert_eq!(cal.occupied_dates.last(), Some(&d("2024-06-19")));
    assert_eq!(cal.occupied_dates.len(), 4);
    assert_eq!(cal.free_periods.len(), 1);
    assert_eq!(cal.free_periods[0].start, d("2024-06-12"));
    assert_eq!(cal.free_periods[0].end, d("2024-06-18"));
  }

  #[test]
  fn released_reservations_do_not_occupy_days() {
    let room = ResourceId::from("101");
    let window = stay("2024-06-01", "2024-06-30");
    let mut cancelled = reservation("101", "2024-06-05", "2024-06-10");
    cancelled.status = ReservationStatus::Cancelled;
    let mut cleared = reservation("101", "2024-06-12", "2024-06-14");
    cleared.cleared_for_rebooking = true;

    let existing = vec![cancelled, cleared];
    assert!(occupied_days(&room, &window, &existing).is_empty());
    assert_eq!(find_gaps(&room, &window, &existing).len(), 1);
  }

  #[test]
  fn periods_and_occupied_days_partition_the_window() {
    let room = ResourceId::from("101");
    let window = stay("2024-06-01", "2024-08-01");
    let existing = vec![
      reservation("101", "2024-05-28", "2024-06-03"),
      reservation("101", "2024-06-07", "2024-06-09"),
      reservation("101", "2024-06-09", "2024-06-10"),
      reservation("101", "2024-06-15", "2024-06-16"),
      reservation("101", "2024-07-20", "2024-08-05"),
    ];
    let cal = calendar(&room, &window, &existing);

    let mut covered: Vec<NaiveDate> = cal.occupied_dates.clone();
    for (i, period) in cal.free_periods.iter().enumerate() {
      assert!(period.start < period.end);
      assert_eq!(period.length, (period.end - period.start).num_days() as u32);
      if let Some(next) = cal.free_periods.get(i + 1) {
        // Ordered, disjoint, and maximal: an occupied day separates them.
        assert!(period.end < next.start);
      }
      covered.extend(period.as_interval().days());
    }
    covered.sort();

    let expected: Vec<NaiveDate> = window.days().collect();
    assert_eq!(covered, expected);
  }
}
