//! Praamid HTTP gateway client.
//!
//! Thin wrapper over the praamid.ee online JSON API. Each session owns
//! its own `reqwest::Client`, so connections are shared between the
//! catalog fetches and the booking submission of one request but never
//! across requests.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, ORIGIN, REFERER};
use serde::de::DeserializeOwned;

use crate::booking::types::BookingRequest;

use super::error::PraamidError;
use super::gateway::{BookingGateway, SessionFactory};
use super::types::{BookingConfirmation, CapacityMapping, ItemsEnvelope, PriceEntry, RawEvent};

/// Default base URL for the praamid.ee online API.
const DEFAULT_BASE_URL: &str = "https://www.praamid.ee/online";

/// Window (seconds) the events endpoint applies around the requested date.
const EVENTS_TIME_SHIFT: &str = "300";

const EVENTS_TIMEOUT: Duration = Duration::from_secs(10);
const CATALOG_TIMEOUT: Duration = Duration::from_secs(7);
const BOOKING_TIMEOUT: Duration = Duration::from_secs(20);

/// The bookings endpoint rejects requests that do not look like they came
/// from the praamid.ee portal itself.
const BOOKING_ORIGIN: &str = "https://www.praamid.ee";
const BOOKING_REFERER: &str = "https://www.praamid.ee/portal/ticket/departure";

/// Configuration for the praamid gateway.
#[derive(Debug, Clone)]
pub struct PraamidConfig {
    /// Base URL for the online API (defaults to production praamid.ee)
    pub base_url: String,
}

impl PraamidConfig {
    /// Create a config pointing at the production API.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for PraamidConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for PraamidConfig {
    fn open(&self) -> Result<Box<dyn BookingGateway>, PraamidError> {
        Ok(Box::new(PraamidClient::new(self)?))
    }
}

/// One gateway session: a `reqwest::Client` scoped to a single inbound
/// request.
#[derive(Debug)]
pub struct PraamidClient {
    http: reqwest::Client,
    base_url: String,
}

impl PraamidClient {
    /// Create a fresh session for the given configuration.
    pub fn new(config: &PraamidConfig) -> Result<Self, PraamidError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// GET a catalog endpoint and unwrap its `{"items": [...]}` envelope.
    async fn get_items<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
        auth: Option<&str>,
    ) -> Result<Vec<T>, PraamidError> {
        let mut request = self.http.get(url).query(query).timeout(timeout);
        if let Some(auth) = auth {
            let value = HeaderValue::from_str(auth).map_err(|_| PraamidError::Unauthorized)?;
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(PraamidError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PraamidError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        let envelope: ItemsEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| PraamidError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(envelope.items)
    }
}

#[async_trait]
impl BookingGateway for PraamidClient {
    async fn fetch_events(
        &self,
        direction: &str,
        date: NaiveDate,
        auth: Option<&str>,
    ) -> Result<Vec<RawEvent>, PraamidError> {
        let url = format!("{}/events", self.base_url);
        self.get_items(
            &url,
            &[
                ("direction", direction.to_string()),
                ("departure-date", date.format("%Y-%m-%d").to_string()),
                ("time-shift", EVENTS_TIME_SHIFT.to_string()),
            ],
            EVENTS_TIMEOUT,
            auth,
        )
        .await
    }

    async fn fetch_item_mappings(
        &self,
        auth: Option<&str>,
    ) -> Result<Vec<CapacityMapping>, PraamidError> {
        let url = format!("{}/item-mappings", self.base_url);
        self.get_items(&url, &[], CATALOG_TIMEOUT, auth).await
    }

    async fn fetch_prices(
        &self,
        pricelist_code: &str,
        date: NaiveDate,
        auth: Option<&str>,
    ) -> Result<Vec<PriceEntry>, PraamidError> {
        let url = format!("{}/prices", self.base_url);
        self.get_items(
            &url,
            &[
                ("pricelist", pricelist_code.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
            ],
            CATALOG_TIMEOUT,
            auth,
        )
        .await
    }

    async fn submit_booking(
        &self,
        booking: &BookingRequest,
        auth: Option<&str>,
    ) -> Result<BookingConfirmation, PraamidError> {
        let url = format!("{}/bookings", self.base_url);

        tracing::debug!(url, "submitting booking");

        let mut request = self
            .http
            .post(&url)
            .header(ORIGIN, BOOKING_ORIGIN)
            .header(REFERER, BOOKING_REFERER)
            .timeout(BOOKING_TIMEOUT)
            .json(booking);
        if let Some(auth) = auth {
            let value = HeaderValue::from_str(auth).map_err(|_| PraamidError::Unauthorized)?;
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(PraamidError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PraamidError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| PraamidError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = PraamidConfig::new().with_base_url("http://localhost:8080/online");
        assert_eq!(config.base_url, "http://localhost:8080/online");
    }

    #[test]
    fn config_defaults() {
        let config = PraamidConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn session_creation() {
        let config = PraamidConfig::new();
        assert!(PraamidClient::new(&config).is_ok());
        assert!(config.open().is_ok());
    }
}
