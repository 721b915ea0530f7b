//! Web server layer: routing, request/response shapes, and the
//! error-to-HTTP mapping.

mod dto;
mod routes;
mod state;

pub use dto::{
    AddToCartRequest, AddToCartResponse, AvailabilityQuery, AvailabilityResponse, ErrorResponse,
    ScheduleQuery,
};
pub use routes::{AppError, create_router};
pub use state::{AppState, DEFAULT_PORTAL_URL};
