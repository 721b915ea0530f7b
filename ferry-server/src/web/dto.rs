//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::booking::SubmittedEvent;

/// Query for the schedule endpoint. Fields are optional so that missing
/// parameters produce our structured 400 instead of an extractor
/// rejection.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Direction code (e.g. "VK")
    pub direction: Option<String>,

    /// Departure date, YYYY-MM-DD
    pub date: Option<String>,
}

/// Query for the slot availability endpoint.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub direction: Option<String>,
    pub date: Option<String>,
    pub event_uid: Option<String>,
}

/// Availability of a single sailing.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub event_uid: String,

    /// Remaining car slots; absent when the upstream did not report the
    /// car capacity class
    pub available_cars: Option<i64>,

    pub is_available: bool,
}

/// Request to resolve fares and submit a booking.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    /// The event as returned by the schedule endpoint (possibly wrapped)
    #[serde(rename = "original_event_data")]
    pub original_event_data: SubmittedEvent,

    /// Direction code for the sailing
    pub direction: String,

    /// Departure date, YYYY-MM-DD
    pub departure_date: String,

    pub num_cars: u32,
    pub num_adults: u32,

    pub user_email: Option<String>,
    pub user_phone: Option<String>,

    /// Required when `num_cars > 0`
    pub vehicle_reg_nr: Option<String>,

    /// Explicit price-list override; normally taken from the event
    pub pricelist_code: Option<String>,
}

/// Successful booking creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartResponse {
    pub message: String,
    pub booking_uid: String,
    pub checkout_url: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Relayed upstream detail, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
