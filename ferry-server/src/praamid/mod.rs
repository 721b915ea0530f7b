//! Praamid.ee booking gateway.
//!
//! This module provides the HTTP client for the undocumented praamid.ee
//! online JSON API, which serves ferry schedules, fare catalogs and the
//! booking endpoint.
//!
//! Key characteristics of the upstream:
//! - Catalog data (item mappings, prices) changes without notice and is
//!   fetched fresh on every booking attempt, never cached
//! - The caller's `Authorization` header is forwarded opaquely
//! - The bookings endpoint expects portal-like `Origin`/`Referer` headers
//!   and returns the booking UID in a field named `response`

mod client;
mod error;
mod gateway;
mod mock;
pub mod types;

pub use client::{PraamidClient, PraamidConfig};
pub use error::PraamidError;
pub use gateway::{BookingGateway, SessionFactory};
pub use mock::MockGateway;
pub use types::{
    BookingConfirmation, CapacityMapping, Direction, ItemRef, ItemsEnvelope, PriceEntry, Pricelist,
    RawEvent, Ship,
};
