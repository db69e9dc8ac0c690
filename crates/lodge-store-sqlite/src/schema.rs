//! SQL schema for the lodge SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS resources (
    resource_id         TEXT PRIMARY KEY,
    name                TEXT NOT NULL,
    nightly_price_cents INTEGER NOT NULL CHECK (nightly_price_cents >= 0),
    active              INTEGER NOT NULL DEFAULT 1,
    occupancy_status    TEXT NOT NULL DEFAULT 'vacant',  -- 'vacant' | 'occupied'
    created_at          TEXT NOT NULL
);

-- Dates are ISO 8601 'YYYY-MM-DD' so text order is date order.
-- Stays are half-open: check_out is the first night not held.
CREATE TABLE IF NOT EXISTS reservations (
    reservation_id        TEXT PRIMARY KEY,
    booking_ref           TEXT NOT NULL,
    resource_id           TEXT NOT NULL REFERENCES resources(resource_id),
    check_in              TEXT NOT NULL,
    check_out             TEXT NOT NULL,
    status                TEXT NOT NULL,   -- 'pending' | 'confirmed' | 'cancelled' | 'completed'
    payment_status        TEXT NOT NULL,   -- 'pending' | 'paid' | 'failed'
    cleared_for_rebooking INTEGER NOT NULL DEFAULT 0,
    guest_json            TEXT NOT NULL,
    adults                INTEGER NOT NULL,
    children              INTEGER NOT NULL DEFAULT 0,
    bed_preference        TEXT,
    quoted_total_cents    INTEGER NOT NULL,
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL,
    CHECK (check_in < check_out)
);

CREATE INDEX IF NOT EXISTS reservations_resource_stay_idx
    ON reservations(resource_id, check_in, check_out);
CREATE INDEX IF NOT EXISTS reservations_booking_idx
    ON reservations(booking_ref);

PRAGMA user_version = 1;
";
