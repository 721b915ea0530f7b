//! Fare resolution and booking payload assembly.
//!
//! This is the decision-making core of the adapter: everything else is
//! HTTP plumbing around these two steps.

mod assemble;
mod fares;
pub mod types;

pub use assemble::{AssembleError, CustomerContact, assemble_booking, effective_pricelist_code};
pub use fares::{
    CartRequest, FareCategory, FareError, PASSENGER_CAPACITY_UNIT, REGULAR_PRICE_CATEGORY,
    VEHICLE_CAPACITY_UNIT, build_price_map, resolve_boarding_passes,
};
pub use types::{
    BoardingPass, BookingRequest, CodeName, CodeRef, Customer, EventSummary, SubmittedEvent,
    Ticket, VehicleCountry,
};
