//! Core types, availability rules and the store trait for lodge.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every interface (API handlers, the server, store backends) answers
//! availability questions through [`engine::Engine`], so the overlap, filter
//! and gap rules are defined exactly once.

// Native `async fn` in traits; the store trait spells out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod availability;
pub mod booking;
pub mod engine;
pub mod error;
pub mod gaps;
pub mod interval;
pub mod occupancy;
pub mod reservation;
pub mod resource;
pub mod store;
pub mod transition;

#[cfg(test)]
mod fixtures;

pub use error::{Error, Result};
