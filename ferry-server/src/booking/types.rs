//! Booking payload types.
//!
//! These are the exact structures the praamid.ee bookings endpoint
//! expects, field names included. Estonian display names on line items
//! are part of the upstream contract and carried verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::praamid::types::{Direction, Pricelist, RawEvent, Ship};

/// A `{code, name}` pair as used for capacity units and items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeName {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A bare `{code}` reference (price category, price list, point of sale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRef {
    pub code: String,
}

impl CodeRef {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Vehicle registration country block, attached only when a plate number
/// was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCountry {
    pub code: String,
    pub names: BTreeMap<String, String>,
}

impl VehicleCountry {
    /// The only country this flow books vehicles from.
    pub fn estonia() -> Self {
        let mut names = BTreeMap::new();
        names.insert("en".to_string(), "Estonia".to_string());
        names.insert("et".to_string(), "Eesti".to_string());
        Self {
            code: "EST".to_string(),
            names,
        }
    }
}

/// A resolved, priced line item ("boarding pass" in upstream terms).
///
/// Invariant: `amount == item_price * quantity` and `quantity > 0`
/// whenever the pass exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingPass {
    pub capacity_unit: CodeName,
    pub quantity: u32,
    pub item: CodeName,

    /// Present on passenger passes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_category: Option<CodeRef>,

    pub item_price: f64,
    pub amount: f64,

    /// Empty string when no plate applies.
    pub vehicle_reg_nr: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_country: Option<VehicleCountry>,

    /// Departure check-in flag, always `"D"` for this flow.
    pub dci: String,

    /// Discount subjects are not supported; the assembler strips any that
    /// upstream defaults may have attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_subjects: Option<Value>,
}

/// Customer contact block. Only the email travels upstream here; the
/// phone number sits on the ticket itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
}

/// Immutable event metadata embedded in the submission, copied verbatim
/// from the upstream event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub dtstart: Option<String>,
    pub dtend: Option<String>,
    pub uid: Option<String>,
    pub pricelist: CodeRef,
    pub transportation_type: Option<String>,
    pub ship: Option<Ship>,
}

/// One ticket of a booking submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub boarding_passes: Vec<BoardingPass>,
    pub services: Vec<Value>,
    pub attachments: Vec<Value>,
    pub customer: Customer,
    pub phone_number: String,
    pub sms_notification: bool,
    pub sms_departure_notification: bool,
    pub calendar_invite: bool,
    pub direction: Direction,
    pub direction_code: String,
    pub event: EventSummary,
    pub pricelist: CodeRef,
    pub pos: CodeRef,
}

/// The final payload for the bookings endpoint. Built once per request
/// and submitted exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub tickets: Vec<Ticket>,
    pub customer: Customer,
}

/// The event echoed back by the client on `add_to_cart`.
///
/// Clients normally send the wrapped entry they received from the
/// schedule endpoint, which nests the raw upstream event under
/// `original_event_data`; a bare upstream event also parses, it just
/// has nothing nested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmittedEvent {
    pub pricelist: Option<Pricelist>,
    pub original_event_data: Option<RawEvent>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
