//! [`SqliteStore`], the SQLite implementation of [`BookingStore`].

use std::{path::Path, time::Duration};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};
use tracing::{debug, warn};
use uuid::Uuid;

use lodge_core::{
  booking::{self, BookingConfirmation, BookingRequest},
  interval::StayInterval,
  reservation::{BookingRef, Reservation},
  resource::{NewResource, OccupancyStatus, Resource, ResourceId},
  store::BookingStore,
  transition::Transition,
};

use crate::{
  Error, Result,
  encode::{
    RESERVATION_COLUMNS, RESOURCE_COLUMNS, RawReservation, RawResource, encode_date,
    encode_dt, encode_guest, encode_occupancy, encode_uuid,
  },
  schema::SCHEMA,
};

/// How long a writer waits for another connection's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A lodge booking store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread, keeping its error type intact.
  async fn with_conn<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut Connection) -> Result<R> + Send + 'static,
    R: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────
//
// Plain functions over a borrowed connection so they work both directly and
// inside a transaction.

fn select_resource(conn: &Connection, id: &ResourceId) -> Result<Option<Resource>> {
  let raw = conn
    .query_row(
      &format!("SELECT {RESOURCE_COLUMNS} FROM resources WHERE resource_id = ?1"),
      rusqlite::params![id.as_str()],
      RawResource::from_row,
    )
    .optional()?;
  raw.map(RawResource::into_resource).transpose()
}

fn select_reservations(
  conn: &Connection,
  filter: &str,
  params: impl rusqlite::Params,
) -> Result<Vec<Reservation>> {
  let mut stmt =
    conn.prepare(&format!("SELECT {RESERVATION_COLUMNS} FROM reservations {filter}"))?;
  let raws = stmt
    .query_map(params, RawReservation::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawReservation::into_reservation).collect()
}

/// Reservations of one room intersecting `window`, whatever their status.
fn reservations_overlapping(
  conn: &Connection,
  id: &ResourceId,
  window: &StayInterval,
) -> Result<Vec<Reservation>> {
  select_reservations(
    conn,
    "WHERE resource_id = ?1 AND check_in < ?2 AND check_out > ?3 ORDER BY check_in",
    rusqlite::params![
      id.as_str(),
      encode_date(window.check_out()),
      encode_date(window.check_in()),
    ],
  )
}

fn insert_reservation(conn: &Connection, r: &Reservation) -> Result<()> {
  conn.execute(
    "INSERT INTO reservations (
       reservation_id, booking_ref, resource_id, check_in, check_out,
       status, payment_status, cleared_for_rebooking, guest_json,
       adults, children, bed_preference, quoted_total_cents,
       created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
    rusqlite::params![
      encode_uuid(r.reservation_id),
      r.booking_ref.as_str(),
      r.resource_id.as_str(),
      encode_date(r.stay.check_in()),
      encode_date(r.stay.check_out()),
      r.status.as_str(),
      r.payment_status.as_str(),
      r.cleared_for_rebooking,
      encode_guest(&r.guest)?,
      r.party.adults,
      r.party.children,
      r.party.bed_preference.map(|b| b.as_str()),
      r.quoted_total_cents,
      encode_dt(r.created_at),
      encode_dt(r.updated_at),
    ],
  )?;
  Ok(())
}

fn update_reservation_state(conn: &Connection, r: &Reservation) -> Result<()> {
  conn.execute(
    "UPDATE reservations
       SET status = ?2, payment_status = ?3, cleared_for_rebooking = ?4, updated_at = ?5
     WHERE reservation_id = ?1",
    rusqlite::params![
      encode_uuid(r.reservation_id),
      r.status.as_str(),
      r.payment_status.as_str(),
      r.cleared_for_rebooking,
      encode_dt(r.updated_at),
    ],
  )?;
  Ok(())
}

/// Secondary occupancy-status write. Failures are logged, never raised.
fn write_occupancy(conn: &Connection, id: &ResourceId, status: OccupancyStatus) {
  let result = conn.execute(
    "UPDATE resources SET occupancy_status = ?2 WHERE resource_id = ?1",
    rusqlite::params![id.as_str(), encode_occupancy(status)],
  );
  if let Err(e) = result {
    warn!(room = %id, "occupancy status write failed: {e}");
  }
}

/// Re-derive a room's occupancy flag after its reservations changed state:
/// occupied while any reservation still holds it, vacant otherwise.
fn settle_occupancy(conn: &Connection, id: &ResourceId) {
  let holding = select_reservations(
    conn,
    "WHERE resource_id = ?1",
    rusqlite::params![id.as_str()],
  )
  .map(|rows| rows.iter().any(Reservation::is_active));
  match holding {
    Ok(true) => write_occupancy(conn, id, OccupancyStatus::Occupied),
    Ok(false) => write_occupancy(conn, id, OccupancyStatus::Vacant),
    Err(e) => warn!(room = %id, "occupancy status read failed: {e}"),
  }
}

/// Secure every selected room inside one immediate transaction.
fn commit_in_transaction(
  conn: &mut Connection,
  booking_ref: BookingRef,
  request: BookingRequest,
  now: DateTime<Utc>,
) -> Result<BookingConfirmation> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let mut reservations = Vec::with_capacity(request.rooms.len());

  for selection in &request.rooms {
    let id = &selection.resource_id;
    let resource = select_resource(&tx, id)?
      .ok_or_else(|| lodge_core::Error::ResourceNotFound(id.clone()))?;
    let existing = reservations_overlapping(&tx, id, &request.stay)?;

    let reservation =
      booking::secure_room(&booking_ref, &request, selection, &resource, &existing, now)?;
    insert_reservation(&tx, &reservation)
      .map_err(|e| lodge_core::Error::persistence(Some(id.clone()), e))?;
    write_occupancy(&tx, id, OccupancyStatus::Occupied);

    debug!(booking = %booking_ref, room = %id, "room secured");
    reservations.push(reservation);
  }

  tx.commit()?;
  Ok(BookingConfirmation::new(booking_ref, request.stay, reservations))
}

// ─── BookingStore impl ───────────────────────────────────────────────────────

impl BookingStore for SqliteStore {
  type Error = Error;

  // ── Rooms ─────────────────────────────────────────────────────────────────

  async fn add_resource(&self, input: NewResource) -> Result<Resource> {
    let resource = Resource {
      resource_id:         input.resource_id,
      name:                input.name,
      nightly_price_cents: input.nightly_price_cents,
      active:              true,
      occupancy:           OccupancyStatus::Vacant,
      created_at:          Utc::now(),
    };

    let row = resource.clone();
    self
      .with_conn(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if select_resource(&tx, &row.resource_id)?.is_some() {
          return Err(lodge_core::Error::ResourceExists(row.resource_id).into());
        }
        tx.execute(
          "INSERT INTO resources (
             resource_id, name, nightly_price_cents, active, occupancy_status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            row.resource_id.as_str(),
            row.name,
            row.nightly_price_cents,
            row.active,
            encode_occupancy(row.occupancy),
            encode_dt(row.created_at),
          ],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(resource)
  }

  async fn get_resource<'a>(&'a self, id: &'a ResourceId) -> Result<Option<Resource>> {
    let id = id.clone();
    self.with_conn(move |conn| select_resource(conn, &id)).await
  }

  async fn list_resources(&self, include_inactive: bool) -> Result<Vec<Resource>> {
    self
      .with_conn(move |conn| {
        let filter = if include_inactive { "" } else { "WHERE active = 1" };
        let mut stmt = conn.prepare(&format!(
          "SELECT {RESOURCE_COLUMNS} FROM resources {filter} ORDER BY resource_id"
        ))?;
        let raws = stmt
          .query_map([], RawResource::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawResource::into_resource).collect()
      })
      .await
  }

  async fn set_resource_active<'a>(
    &'a self,
    id: &'a ResourceId,
    active: bool,
  ) -> Result<Resource> {
    let id = id.clone();
    self
      .with_conn(move |conn| {
        let changed = conn.execute(
          "UPDATE resources SET active = ?2 WHERE resource_id = ?1",
          rusqlite::params![id.as_str(), active],
        )?;
        if changed == 0 {
          return Err(lodge_core::Error::ResourceNotFound(id).into());
        }
        select_resource(conn, &id)?
          .ok_or_else(|| lodge_core::Error::ResourceNotFound(id).into())
      })
      .await
  }

  // ── Reservations: reads ──────────────────────────────────────────────────

  async fn reservations_for_resource<'a>(
    &'a self,
    id: &'a ResourceId,
    window: StayInterval,
  ) -> Result<Vec<Reservation>> {
    let id = id.clone();
    self
      .with_conn(move |conn| reservations_overlapping(conn, &id, &window))
      .await
  }

  async fn reservations_in_window(&self, window: StayInterval) -> Result<Vec<Reservation>> {
    self
      .with_conn(move |conn| {
        select_reservations(
          conn,
          "WHERE check_in < ?1 AND check_out > ?2 ORDER BY resource_id, check_in",
          rusqlite::params![encode_date(window.check_out()), encode_date(window.check_in())],
        )
      })
      .await
  }

  async fn get_reservation(&self, id: Uuid) -> Result<Option<Reservation>> {
    self
      .with_conn(move |conn| {
        let mut found = select_reservations(
          conn,
          "WHERE reservation_id = ?1",
          rusqlite::params![encode_uuid(id)],
        )?;
        Ok(found.pop())
      })
      .await
  }

  async fn booking_reservations<'a>(
    &'a self,
    booking_ref: &'a BookingRef,
  ) -> Result<Vec<Reservation>> {
    let booking_ref = booking_ref.clone();
    self
      .with_conn(move |conn| {
        select_reservations(
          conn,
          "WHERE booking_ref = ?1 ORDER BY rowid",
          rusqlite::params![booking_ref.as_str()],
        )
      })
      .await
  }

  // ── Reservations: writes ─────────────────────────────────────────────────

  async fn commit_booking(&self, request: BookingRequest) -> Result<BookingConfirmation> {
    let booking_ref = BookingRef::generate();
    let now = Utc::now();
    self
      .with_conn(move |conn| commit_in_transaction(conn, booking_ref, request, now))
      .await
  }

  async fn transition_reservation(
    &self,
    id: Uuid,
    transition: Transition,
  ) -> Result<Reservation> {
    let now = Utc::now();
    self
      .with_conn(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = select_reservations(
          &tx,
          "WHERE reservation_id = ?1",
          rusqlite::params![encode_uuid(id)],
        )?
        .pop()
        .ok_or(lodge_core::Error::ReservationNotFound(id))?;

        let next = transition.apply(&current, now)?;
        update_reservation_state(&tx, &next)?;
        settle_occupancy(&tx, &next.resource_id);
        tx.commit()?;
        Ok(next)
      })
      .await
  }

  async fn transition_booking<'a>(
    &'a self,
    booking_ref: &'a BookingRef,
    transition: Transition,
  ) -> Result<Vec<Reservation>> {
    let booking_ref = booking_ref.clone();
    let now = Utc::now();
    self
      .with_conn(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = select_reservations(
          &tx,
          "WHERE booking_ref = ?1 ORDER BY rowid",
          rusqlite::params![booking_ref.as_str()],
        )?;
        if current.is_empty() {
          return Err(lodge_core::Error::BookingNotFound(booking_ref).into());
        }

        let next = current
          .iter()
          .map(|r| transition.apply(r, now))
          .collect::<lodge_core::Result<Vec<_>>>()?;
        for r in &next {
          update_reservation_state(&tx, r)?;
        }
        for r in &next {
          settle_occupancy(&tx, &r.resource_id);
        }
        tx.commit()?;
        Ok(next)
      })
      .await
  }
}
