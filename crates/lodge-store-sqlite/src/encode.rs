//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, stay dates are `YYYY-MM-DD`, guest
//! details are compact JSON and UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use lodge_core::{
  interval::StayInterval,
  reservation::{
    BedPreference, BookingRef, GuestInfo, Party, PaymentStatus, Reservation,
    ReservationStatus,
  },
  resource::{OccupancyStatus, Resource, ResourceId},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

fn unknown(column: &'static str, value: &str) -> Error {
  Error::UnknownValue { column, value: value.to_owned() }
}

pub fn decode_status(s: &str) -> Result<ReservationStatus> {
  match s {
    "pending" => Ok(ReservationStatus::Pending),
    "confirmed" => Ok(ReservationStatus::Confirmed),
    "cancelled" => Ok(ReservationStatus::Cancelled),
    "completed" => Ok(ReservationStatus::Completed),
    other => Err(unknown("status", other)),
  }
}

pub fn decode_payment_status(s: &str) -> Result<PaymentStatus> {
  match s {
    "pending" => Ok(PaymentStatus::Pending),
    "paid" => Ok(PaymentStatus::Paid),
    "failed" => Ok(PaymentStatus::Failed),
    other => Err(unknown("payment_status", other)),
  }
}

pub fn decode_bed_preference(s: &str) -> Result<BedPreference> {
  match s {
    "king" => Ok(BedPreference::King),
    "queen" => Ok(BedPreference::Queen),
    "twin" => Ok(BedPreference::Twin),
    "double" => Ok(BedPreference::Double),
    other => Err(unknown("bed_preference", other)),
  }
}

pub fn encode_occupancy(o: OccupancyStatus) -> &'static str {
  match o {
    OccupancyStatus::Vacant => "vacant",
    OccupancyStatus::Occupied => "occupied",
  }
}

pub fn decode_occupancy(s: &str) -> Result<OccupancyStatus> {
  match s {
    "vacant" => Ok(OccupancyStatus::Vacant),
    "occupied" => Ok(OccupancyStatus::Occupied),
    other => Err(unknown("occupancy_status", other)),
  }
}

// ─── Guest ───────────────────────────────────────────────────────────────────

pub fn encode_guest(g: &GuestInfo) -> Result<String> { Ok(serde_json::to_string(g)?) }

pub fn decode_guest(s: &str) -> Result<GuestInfo> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawResource::from_row`].
pub const RESOURCE_COLUMNS: &str =
  "resource_id, name, nightly_price_cents, active, occupancy_status, created_at";

/// Raw values read directly from a `resources` row.
pub struct RawResource {
  pub resource_id:         String,
  pub name:                String,
  pub nightly_price_cents: i64,
  pub active:              bool,
  pub occupancy_status:    String,
  pub created_at:          String,
}

impl RawResource {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      resource_id:         row.get(0)?,
      name:                row.get(1)?,
      nightly_price_cents: row.get(2)?,
      active:              row.get(3)?,
      occupancy_status:    row.get(4)?,
      created_at:          row.get(5)?,
    })
  }

  pub fn into_resource(self) -> Result<Resource> {
    Ok(Resource {
      resource_id:         ResourceId::new(self.resource_id),
      name:                self.name,
      nightly_price_cents: self.nightly_price_cents,
      active:              self.active,
      occupancy:           decode_occupancy(&self.occupancy_status)?,
      created_at:          decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawReservation::from_row`].
pub const RESERVATION_COLUMNS: &str = "reservation_id, booking_ref, resource_id, \
   check_in, check_out, status, payment_status, cleared_for_rebooking, \
   guest_json, adults, children, bed_preference, quoted_total_cents, \
   created_at, updated_at";

/// Raw values read directly from a `reservations` row.
pub struct RawReservation {
  pub reservation_id:        String,
  pub booking_ref:           String,
  pub resource_id:           String,
  pub check_in:              String,
  pub check_out:             String,
  pub status:                String,
  pub payment_status:        String,
  pub cleared_for_rebooking: bool,
  pub guest_json:            String,
  pub adults:                u8,
  pub children:              u8,
  pub bed_preference:        Option<String>,
  pub quoted_total_cents:    i64,
  pub created_at:            String,
  pub updated_at:            String,
}

impl RawReservation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      reservation_id:        row.get(0)?,
      booking_ref:           row.get(1)?,
      resource_id:           row.get(2)?,
      check_in:              row.get(3)?,
      check_out:             row.get(4)?,
      status:                row.get(5)?,
      payment_status:        row.get(6)?,
      cleared_for_rebooking: row.get(7)?,
      guest_json:            row.get(8)?,
      adults:                row.get(9)?,
      children:              row.get(10)?,
      bed_preference:        row.get(11)?,
      quoted_total_cents:    row.get(12)?,
      created_at:            row.get(13)?,
      updated_at:            row.get(14)?,
    })
  }

  pub fn into_reservation(self) -> Result<Reservation> {
    let stay =
      StayInterval::new(decode_date(&self.check_in)?, decode_date(&self.check_out)?)?;
    Ok(Reservation {
      reservation_id:        decode_uuid(&self.reservation_id)?,
      booking_ref:           BookingRef::new(self.booking_ref),
      resource_id:           ResourceId::new(self.resource_id),
      stay,
      status:                decode_status(&self.status)?,
      payment_status:        decode_payment_status(&self.payment_status)?,
      cleared_for_rebooking: self.cleared_for_rebooking,
      guest:                 decode_guest(&self.guest_json)?,
      party:                 Party {
        adults:         self.adults,
        children:       self.children,
        bed_preference: self
          .bed_preference
          .as_deref()
          .map(decode_bed_preference)
          .transpose()?,
      },
      quoted_total_cents:    self.quoted_total_cents,
      created_at:            decode_dt(&self.created_at)?,
      updated_at:            decode_dt(&self.updated_at)?,
    })
  }
}
