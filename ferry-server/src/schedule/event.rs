//! Normalized schedule events.
//!
//! Wraps a raw upstream sailing with derived display times and keeps the
//! original item verbatim so clients can echo it back when booking.

use serde::Serialize;
use serde_json::Value;

use crate::praamid::types::{Pricelist, RawEvent, Ship};

use super::timefmt::normalize_display_time;

/// Capacity-class code for remaining car slots in the upstream
/// `capacities` map.
pub const VEHICLE_CAPACITY_CLASS: &str = "sv";

/// A sailing as served to the client.
///
/// The ISO instants are authoritative and copied untouched; the display
/// times are derived once at parse time. Field names follow the wire
/// format the frontend already speaks, hence the mixed naming.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEvent {
    pub dtstart_utc_iso: Option<String>,
    pub dtend_utc_iso: Option<String>,

    #[serde(rename = "startTimeLocal")]
    pub start_time_local: String,

    #[serde(rename = "endTimeLocal")]
    pub end_time_local: String,

    pub capacities: serde_json::Map<String, Value>,
    pub ship: Option<Ship>,
    pub pricelist: Option<Pricelist>,
    pub event_uid: Option<String>,

    /// The upstream item, verbatim, for the later booking submission.
    pub original_event_data: RawEvent,
}

impl ScheduleEvent {
    /// Build the client-facing view of one upstream sailing.
    pub fn from_raw(raw: RawEvent) -> Self {
        Self {
            dtstart_utc_iso: raw.dtstart.clone(),
            dtend_utc_iso: raw.dtend.clone(),
            start_time_local: display_time(raw.dtstart.as_deref()),
            end_time_local: display_time(raw.dtend.as_deref()),
            capacities: raw.capacities.clone(),
            ship: raw.ship.clone(),
            pricelist: raw.pricelist.clone(),
            event_uid: raw.uid.clone(),
            original_event_data: raw,
        }
    }

    /// Remaining car capacity, if the upstream reported one.
    pub fn vehicle_capacity(&self) -> Option<i64> {
        self.capacities
            .get(VEHICLE_CAPACITY_CLASS)
            .and_then(Value::as_i64)
    }

    /// Whether at least one car slot remains.
    pub fn has_vehicle_space(&self) -> bool {
        self.vehicle_capacity().is_some_and(|n| n > 0)
    }
}

fn display_time(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => normalize_display_time(raw),
        None => "N/A".to_string(),
    }
}
