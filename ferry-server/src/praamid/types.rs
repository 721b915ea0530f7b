//! Praamid API response DTOs.
//!
//! These types map directly to the praamid.ee online JSON API. They use
//! `Option` liberally because the upstream omits fields rather than
//! sending nulls, and `#[serde(flatten)]` maps so that sub-objects we do
//! not interpret still round-trip verbatim into the booking submission.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// List envelope used by every catalog endpoint (`{"items": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// A single sailing from the events endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Unique identifier of the sailing.
    pub uid: Option<String>,

    /// Departure instant, ISO 8601. Format varies; see `schedule::timefmt`.
    pub dtstart: Option<String>,

    /// Arrival instant, ISO 8601.
    pub dtend: Option<String>,

    /// Remaining capacity per capacity-class code (e.g. `"sv"` for cars).
    #[serde(default)]
    pub capacities: Map<String, Value>,

    /// Ship descriptor.
    pub ship: Option<Ship>,

    /// Price list attached to this sailing.
    pub pricelist: Option<Pricelist>,

    pub transportation_type: Option<String>,

    /// Rich direction object; preferred over a bare code when present.
    pub direction: Option<Direction>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ship descriptor. Only the code is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub code: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Price list reference on an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricelist {
    pub code: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sailing direction. The upstream event may carry a rich object here;
/// the booking payload falls back to a minimal `{code}` when it does not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub code: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Direction {
    /// Minimal direction object holding only a code.
    pub fn from_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            extra: Map::new(),
        }
    }
}

/// A catalog entry binding a capacity unit and price category to an
/// upstream item code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityMapping {
    pub capacity_unit_code: Option<String>,
    pub price_category: Option<String>,
    pub item_code: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A price catalog entry: unit amount for one item code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub item: Option<ItemRef>,
    pub amount: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Item reference inside a price entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRef {
    pub code: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from the bookings endpoint. The booking UID arrives in the
/// oddly-named `response` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub response: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
