//! The gateway seam between the core logic and the upstream website.
//!
//! Handlers never hold a long-lived client: a [`SessionFactory`] opens one
//! gateway session per inbound request, so upstream connections and any
//! transport state are scoped to exactly one request and discarded with it.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::booking::types::BookingRequest;

use super::error::PraamidError;
use super::types::{BookingConfirmation, CapacityMapping, PriceEntry, RawEvent};

/// The four outbound calls the adapter makes.
///
/// `auth` is the caller's `Authorization` header value, forwarded opaquely
/// when auth forwarding is enabled. None of these calls is ever retried.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Fetch the day's sailings for a direction.
    async fn fetch_events(
        &self,
        direction: &str,
        date: NaiveDate,
        auth: Option<&str>,
    ) -> Result<Vec<RawEvent>, PraamidError>;

    /// Fetch the capacity-unit to item-code catalog.
    async fn fetch_item_mappings(
        &self,
        auth: Option<&str>,
    ) -> Result<Vec<CapacityMapping>, PraamidError>;

    /// Fetch the price catalog for one price list and date.
    async fn fetch_prices(
        &self,
        pricelist_code: &str,
        date: NaiveDate,
        auth: Option<&str>,
    ) -> Result<Vec<PriceEntry>, PraamidError>;

    /// Submit an assembled booking.
    async fn submit_booking(
        &self,
        request: &BookingRequest,
        auth: Option<&str>,
    ) -> Result<BookingConfirmation, PraamidError>;
}

/// Opens one gateway session per inbound request.
pub trait SessionFactory: Send + Sync {
    fn open(&self) -> Result<Box<dyn BookingGateway>, PraamidError>;
}
