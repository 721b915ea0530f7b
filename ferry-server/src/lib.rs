//! Server-side adapter for the praamid.ee ferry booking API.
//!
//! Sits between a browser ticket-checking client and the undocumented
//! upstream JSON API: fetches sailing schedules, reports car capacity,
//! resolves fares from the upstream catalogs, and submits bookings on
//! the client's behalf.

pub mod booking;
pub mod praamid;
pub mod schedule;
pub mod web;
