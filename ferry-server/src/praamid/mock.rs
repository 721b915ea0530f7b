//! Mock booking gateway for testing without upstream access.
//!
//! Serves canned catalog data and records submitted bookings so tests can
//! assert on the exact payload that would have reached praamid.ee.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::booking::types::BookingRequest;

use super::error::PraamidError;
use super::gateway::{BookingGateway, SessionFactory};
use super::types::{BookingConfirmation, CapacityMapping, PriceEntry, RawEvent};

/// In-memory gateway with configurable responses.
#[derive(Clone, Default)]
pub struct MockGateway {
    events: Vec<RawEvent>,
    mappings: Vec<CapacityMapping>,
    prices: Vec<PriceEntry>,
    booking_uid: Option<String>,
    booking_failure: Option<(u16, String)>,
    submitted: Arc<Mutex<Vec<BookingRequest>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events returned by `fetch_events`, regardless of direction/date.
    pub fn with_events(mut self, events: Vec<RawEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_mappings(mut self, mappings: Vec<CapacityMapping>) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn with_prices(mut self, prices: Vec<PriceEntry>) -> Self {
        self.prices = prices;
        self
    }

    /// Booking UID returned on successful submission.
    pub fn with_booking_uid(mut self, uid: impl Into<String>) -> Self {
        self.booking_uid = Some(uid.into());
        self
    }

    /// Make `submit_booking` fail with an upstream HTTP error.
    pub fn with_booking_failure(mut self, status: u16, body: impl Into<String>) -> Self {
        self.booking_failure = Some((status, body.into()));
        self
    }

    /// Bookings submitted so far, in order.
    pub fn submitted(&self) -> Vec<BookingRequest> {
        self.submitted.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl BookingGateway for MockGateway {
    async fn fetch_events(
        &self,
        _direction: &str,
        _date: NaiveDate,
        _auth: Option<&str>,
    ) -> Result<Vec<RawEvent>, PraamidError> {
        Ok(self.events.clone())
    }

    async fn fetch_item_mappings(
        &self,
        _auth: Option<&str>,
    ) -> Result<Vec<CapacityMapping>, PraamidError> {
        Ok(self.mappings.clone())
    }

    async fn fetch_prices(
        &self,
        _pricelist_code: &str,
        _date: NaiveDate,
        _auth: Option<&str>,
    ) -> Result<Vec<PriceEntry>, PraamidError> {
        Ok(self.prices.clone())
    }

    async fn submit_booking(
        &self,
        request: &BookingRequest,
        _auth: Option<&str>,
    ) -> Result<BookingConfirmation, PraamidError> {
        if let Some((status, body)) = &self.booking_failure {
            return Err(PraamidError::Api {
                status: *status,
                body: body.clone(),
            });
        }

        self.submitted
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());

        Ok(BookingConfirmation {
            response: self.booking_uid.clone(),
            extra: serde_json::Map::new(),
        })
    }
}

impl SessionFactory for MockGateway {
    fn open(&self) -> Result<Box<dyn BookingGateway>, PraamidError> {
        Ok(Box::new(self.clone()))
    }
}
