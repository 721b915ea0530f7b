//! Application state for the web layer.

use std::sync::Arc;

use crate::praamid::SessionFactory;

/// Default base URL for the praamid.ee customer portal (checkout links).
pub const DEFAULT_PORTAL_URL: &str = "https://www.praamid.ee/portal";

/// Shared application state.
///
/// Holds no upstream connections: the session factory opens a fresh
/// gateway session for every request.
#[derive(Clone)]
pub struct AppState {
    /// Opens one upstream session per inbound request
    pub sessions: Arc<dyn SessionFactory>,

    /// Whether the inbound `Authorization` header is required and
    /// forwarded upstream
    pub forward_auth: bool,

    /// Portal base URL used to build checkout links
    pub portal_base_url: String,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        sessions: Arc<dyn SessionFactory>,
        forward_auth: bool,
        portal_base_url: String,
    ) -> Self {
        Self {
            sessions,
            forward_auth,
            portal_base_url,
        }
    }

    /// Checkout URL for a created booking.
    pub fn checkout_url(&self, booking_uid: &str) -> String {
        format!(
            "{}/ticket/checkout?bookingUid={}",
            self.portal_base_url, booking_uid
        )
    }
}
