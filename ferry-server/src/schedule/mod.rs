//! Schedule normalization: display times and the client-facing view of
//! upstream sailings.

mod event;
mod timefmt;

pub use event::{ScheduleEvent, VEHICLE_CAPACITY_CLASS};
pub use timefmt::normalize_display_time;
