//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::booking::{
    AssembleError, CartRequest, CustomerContact, FareError, assemble_booking,
    effective_pricelist_code, resolve_boarding_passes,
};
use crate::praamid::PraamidError;
use crate::schedule::ScheduleEvent;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// CORS is wide open: the whole point of this adapter is to let a
/// browser frontend reach an upstream it cannot call directly.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/api/get_schedule", get(get_schedule))
        .route("/api/add_to_cart", post(add_to_cart))
        .route("/api/check_slot_availability", get(check_slot_availability))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn home() -> &'static str {
    "Ferry Ticket Checker Backend is running."
}

/// List the day's sailings for a direction, with normalized display times.
async fn get_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleEvent>>, AppError> {
    let (direction, date) = schedule_params(query.direction.as_deref(), query.date.as_deref())?;
    let auth = bearer_token(&state, &headers)?;

    let gateway = state.sessions.open()?;
    let events = gateway
        .fetch_events(direction, date, auth.as_deref())
        .await?;

    tracing::info!(direction, %date, count = events.len(), "fetched schedule");

    Ok(Json(events.into_iter().map(ScheduleEvent::from_raw).collect()))
}

/// Check remaining car capacity for one sailing.
///
/// A sailing absent from the day's schedule is a 404, never a
/// zero-availability answer.
async fn check_slot_availability(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let (direction, date) = schedule_params(query.direction.as_deref(), query.date.as_deref())?;
    let event_uid = query
        .event_uid
        .as_deref()
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| AppError::BadRequest {
            message: "Missing event_uid parameter".to_string(),
        })?;
    let auth = bearer_token(&state, &headers)?;

    let gateway = state.sessions.open()?;
    let events = gateway
        .fetch_events(direction, date, auth.as_deref())
        .await?;

    let event = events
        .into_iter()
        .find(|e| e.uid.as_deref() == Some(event_uid))
        .ok_or_else(|| AppError::NotFound {
            message: format!("Event {event_uid} not found in schedule for {date}"),
        })?;

    let event = ScheduleEvent::from_raw(event);

    Ok(Json(AvailabilityResponse {
        event_uid: event_uid.to_string(),
        available_cars: event.vehicle_capacity(),
        is_available: event.has_vehicle_space(),
    }))
}

/// Resolve fares for the requested cart and submit a booking upstream.
async fn add_to_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: AddToCartRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, body = %String::from_utf8_lossy(&body), "bad add_to_cart body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let auth = bearer_token(&state, &headers)?;
    let date = parse_date(&req.departure_date)?;

    // Policy: an explicit no-items cart is a client error, rejected
    // before any upstream call.
    if req.num_cars == 0 && req.num_adults == 0 {
        return Err(AppError::BadRequest {
            message: "No items (cars or adults) specified for booking".to_string(),
        });
    }

    let email = non_empty(req.user_email.as_deref()).ok_or_else(|| AppError::BadRequest {
        message: "Missing userEmail".to_string(),
    })?;
    let phone = non_empty(req.user_phone.as_deref()).ok_or_else(|| AppError::BadRequest {
        message: "Missing userPhone".to_string(),
    })?;

    let plate = non_empty(req.vehicle_reg_nr.as_deref());
    if req.num_cars > 0 && plate.is_none() {
        return Err(AppError::BadRequest {
            message: "vehicleRegNr is required when booking a vehicle".to_string(),
        });
    }

    let pricelist_code =
        effective_pricelist_code(req.pricelist_code.as_deref(), &req.original_event_data)
            .ok_or_else(|| AppError::BadRequest {
                message: "Missing pricelistCode, cannot determine item prices".to_string(),
            })?;

    // Catalogs are fetched fresh on every attempt, sharing this one
    // session, and discarded with the request.
    let gateway = state.sessions.open()?;
    let mappings = gateway.fetch_item_mappings(auth.as_deref()).await?;
    let prices = gateway
        .fetch_prices(&pricelist_code, date, auth.as_deref())
        .await?;

    let cart = CartRequest {
        num_cars: req.num_cars,
        num_adults: req.num_adults,
        vehicle_reg_nr: plate.map(str::to_string),
    };
    let passes = resolve_boarding_passes(&mappings, &prices, &cart)?;

    let contact = CustomerContact {
        email: email.to_string(),
        phone: phone.to_string(),
    };
    let booking = assemble_booking(
        passes,
        &req.original_event_data,
        &req.direction,
        Some(&pricelist_code),
        &contact,
    )?;

    let confirmation = gateway.submit_booking(&booking, auth.as_deref()).await?;

    let booking_uid = confirmation
        .response
        .clone()
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| {
            tracing::error!(?confirmation, "booking accepted upstream but no UID returned");
            AppError::Internal {
                message: "Booking created but UID not found in response".to_string(),
            }
        })?;

    tracing::info!(%booking_uid, "created booking");

    let response = AddToCartResponse {
        message: "Successfully created booking".to_string(),
        checkout_url: state.checkout_url(&booking_uid),
        booking_uid,
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Validate the shared direction/date query parameters.
fn schedule_params<'a>(
    direction: Option<&'a str>,
    date: Option<&str>,
) -> Result<(&'a str, NaiveDate), AppError> {
    let (Some(direction), Some(date)) = (
        direction.filter(|d| !d.is_empty()),
        date.filter(|d| !d.is_empty()),
    ) else {
        return Err(AppError::BadRequest {
            message: "Missing direction or date parameter".to_string(),
        });
    };
    Ok((direction, parse_date(date)?))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
        message: "Invalid date format. Use YYYY-MM-DD".to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Extract the Authorization header value to forward upstream.
///
/// With auth forwarding disabled, nothing is required and nothing is
/// sent.
fn bearer_token(state: &AppState, headers: &HeaderMap) -> Result<Option<String>, AppError> {
    if !state.forward_auth {
        return Ok(None);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| Some(v.to_string()))
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing Authorization header".to_string(),
        })
}

/// Application error type, mapping the failure taxonomy to HTTP.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request fields
    BadRequest { message: String },

    /// Missing inbound credentials, or upstream rejected them
    Unauthorized { message: String },

    NotFound { message: String },

    /// Upstream returned a non-2xx status; relayed verbatim
    Upstream { status: u16, details: String },

    /// Network/timeout failure reaching upstream
    Transport { message: String },

    /// Upstream response was not valid JSON
    Decode { message: String },

    Internal { message: String },
}

impl From<PraamidError> for AppError {
    fn from(e: PraamidError) -> Self {
        match e {
            PraamidError::Http(e) => AppError::Transport {
                message: format!("Upstream request failed: {e}"),
            },
            PraamidError::Json { message, .. } => AppError::Decode {
                message: format!("Failed to decode upstream response: {message}"),
            },
            PraamidError::Api { status, body } => AppError::Upstream {
                status,
                details: body,
            },
            PraamidError::Unauthorized => AppError::Unauthorized {
                message: "Authorization failed. Token may be invalid or expired.".to_string(),
            },
        }
    }
}

impl From<FareError> for AppError {
    fn from(e: FareError) -> Self {
        // Domain-level resolution failure: the request was well-formed,
        // the upstream catalogs just cannot price it.
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<AssembleError> for AppError {
    fn from(e: AssembleError) -> Self {
        match e {
            AssembleError::MissingPricelist => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, None),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message, None),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message, None),
            AppError::Upstream { status, details } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                // Upstream errors are often JSON; relay them structured
                // when they are, raw otherwise.
                let details = serde_json::from_str::<Value>(&details)
                    .unwrap_or(Value::String(details));
                (
                    status,
                    format!("Upstream returned HTTP {}", status.as_u16()),
                    Some(details),
                )
            }
            AppError::Transport { message } => (StatusCode::SERVICE_UNAVAILABLE, message, None),
            AppError::Decode { message } => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
        };

        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: message,
            details,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::praamid::MockGateway;
    use crate::praamid::types::{CapacityMapping, ItemRef, PriceEntry, RawEvent};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn raw_event() -> RawEvent {
        serde_json::from_value(json!({
            "uid": "evt-1",
            "dtstart": "2025-07-01T05:30:00Z",
            "dtend": "2025-07-01T06:00:00Z",
            "capacities": {"sv": 5},
            "ship": {"code": "TIIU"},
            "pricelist": {"code": "P1"}
        }))
        .unwrap()
    }

    fn mappings() -> Vec<CapacityMapping> {
        vec![
            CapacityMapping {
                capacity_unit_code: Some("M1".into()),
                price_category: Some("REGULAR".into()),
                item_code: Some("S06".into()),
                ..Default::default()
            },
            CapacityMapping {
                capacity_unit_code: Some("P".into()),
                price_category: Some("REGULAR".into()),
                item_code: Some("S01".into()),
                ..Default::default()
            },
        ]
    }

    fn prices() -> Vec<PriceEntry> {
        vec![
            PriceEntry {
                item: Some(ItemRef {
                    code: Some("S06".into()),
                    ..Default::default()
                }),
                amount: Some(25.0),
                ..Default::default()
            },
            PriceEntry {
                item: Some(ItemRef {
                    code: Some("S01".into()),
                    ..Default::default()
                }),
                amount: Some(4.5),
                ..Default::default()
            },
        ]
    }

    fn app(mock: MockGateway) -> Router {
        let state = AppState::new(Arc::new(mock), true, "https://portal.test".to_string());
        create_router(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, "Bearer test-token")
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, "Bearer test-token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn cart_body() -> Value {
        json!({
            "original_event_data": {
                "pricelist": {"code": "P1"},
                "original_event_data": {
                    "uid": "evt-1",
                    "dtstart": "2025-07-01T05:30:00Z",
                    "dtend": "2025-07-01T06:00:00Z",
                    "transportationType": "ferry",
                    "ship": {"code": "TIIU"}
                }
            },
            "direction": "VK",
            "departureDate": "2025-07-01",
            "numCars": 2,
            "numAdults": 1,
            "userEmail": "rider@example.com",
            "userPhone": "+3725551234",
            "vehicleRegNr": "123ABC"
        })
    }

    #[tokio::test]
    async fn schedule_returns_normalized_events() {
        let mock = MockGateway::new().with_events(vec![raw_event()]);
        let (status, body) = send(
            app(mock),
            get("/api/get_schedule?direction=VK&date=2025-07-01"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["startTimeLocal"], "05:30");
        assert_eq!(body[0]["endTimeLocal"], "06:00");
        assert_eq!(body[0]["event_uid"], "evt-1");
        assert_eq!(body[0]["original_event_data"]["uid"], "evt-1");
    }

    #[tokio::test]
    async fn schedule_requires_direction_and_date() {
        let (status, body) = send(
            app(MockGateway::new()),
            get("/api/get_schedule?direction=VK"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing direction or date parameter");
    }

    #[tokio::test]
    async fn schedule_rejects_malformed_date() {
        let (status, body) = send(
            app(MockGateway::new()),
            get("/api/get_schedule?direction=VK&date=01.07.2025"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid date format. Use YYYY-MM-DD");
    }

    #[tokio::test]
    async fn schedule_requires_authorization_header() {
        let request = Request::builder()
            .uri("/api/get_schedule?direction=VK&date=2025-07-01")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(MockGateway::new()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing Authorization header");
    }

    #[tokio::test]
    async fn auth_forwarding_off_needs_no_header() {
        let state = AppState::new(
            Arc::new(MockGateway::new().with_events(vec![raw_event()])),
            false,
            "https://portal.test".to_string(),
        );
        let request = Request::builder()
            .uri("/api/get_schedule?direction=VK&date=2025-07-01")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(create_router(state), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn availability_for_known_event() {
        let mock = MockGateway::new().with_events(vec![raw_event()]);
        let (status, body) = send(
            app(mock),
            get("/api/check_slot_availability?direction=VK&date=2025-07-01&event_uid=evt-1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event_uid"], "evt-1");
        assert_eq!(body["available_cars"], 5);
        assert_eq!(body["is_available"], true);
    }

    #[tokio::test]
    async fn availability_for_unknown_event_is_not_found() {
        let mock = MockGateway::new().with_events(vec![raw_event()]);
        let (status, body) = send(
            app(mock),
            get("/api/check_slot_availability?direction=VK&date=2025-07-01&event_uid=evt-9"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("evt-9"));
    }

    #[tokio::test]
    async fn availability_sold_out_is_still_ok() {
        let mut event = raw_event();
        event.capacities.insert("sv".into(), json!(0));
        let mock = MockGateway::new().with_events(vec![event]);
        let (status, body) = send(
            app(mock),
            get("/api/check_slot_availability?direction=VK&date=2025-07-01&event_uid=evt-1"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available_cars"], 0);
        assert_eq!(body["is_available"], false);
    }

    #[tokio::test]
    async fn add_to_cart_creates_booking() {
        let mock = MockGateway::new()
            .with_mappings(mappings())
            .with_prices(prices())
            .with_booking_uid("B123");
        let (status, body) = send(
            app(mock.clone()),
            post_json("/api/add_to_cart", cart_body()),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["bookingUid"], "B123");
        assert_eq!(
            body["checkoutUrl"],
            "https://portal.test/ticket/checkout?bookingUid=B123"
        );

        let submitted = mock.submitted();
        assert_eq!(submitted.len(), 1);
        let ticket = &submitted[0].tickets[0];
        assert_eq!(ticket.boarding_passes.len(), 2);
        assert_eq!(ticket.boarding_passes[0].item.code, "S06");
        assert_eq!(ticket.boarding_passes[0].amount, 50.0);
        assert_eq!(ticket.boarding_passes[0].vehicle_reg_nr, "123ABC");
        assert_eq!(ticket.boarding_passes[1].item.code, "S01");
        assert_eq!(ticket.pricelist.code, "P1");
        assert_eq!(ticket.event.uid.as_deref(), Some("evt-1"));
        assert_eq!(submitted[0].customer.email, "rider@example.com");
    }

    #[tokio::test]
    async fn add_to_cart_rejects_empty_cart() {
        let mut body = cart_body();
        body["numCars"] = json!(0);
        body["numAdults"] = json!(0);

        let (status, response) = send(
            app(MockGateway::new()),
            post_json("/api/add_to_cart", body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["error"],
            "No items (cars or adults) specified for booking"
        );
    }

    #[tokio::test]
    async fn add_to_cart_requires_plate_for_cars() {
        let mut body = cart_body();
        body.as_object_mut().unwrap().remove("vehicleRegNr");

        let (status, response) = send(
            app(MockGateway::new()),
            post_json("/api/add_to_cart", body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["error"],
            "vehicleRegNr is required when booking a vehicle"
        );
    }

    #[tokio::test]
    async fn add_to_cart_requires_contact_details() {
        let mut body = cart_body();
        body["userEmail"] = json!("");

        let (status, response) = send(
            app(MockGateway::new()),
            post_json("/api/add_to_cart", body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Missing userEmail");
    }

    #[tokio::test]
    async fn add_to_cart_uses_event_pricelist_when_cart_has_none() {
        let mock = MockGateway::new()
            .with_mappings(mappings())
            .with_prices(prices())
            .with_booking_uid("B124");
        // cart_body carries no explicit pricelistCode; the wrapped
        // event's pricelist P1 must be used.
        let (status, _) = send(
            app(mock.clone()),
            post_json("/api/add_to_cart", cart_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(mock.submitted()[0].tickets[0].event.pricelist.code, "P1");
    }

    #[tokio::test]
    async fn add_to_cart_without_any_pricelist_is_bad_request() {
        let mut body = cart_body();
        body["original_event_data"] = json!({"original_event_data": {"uid": "evt-1"}});

        let (status, response) = send(
            app(MockGateway::new()),
            post_json("/api/add_to_cart", body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            response["error"]
                .as_str()
                .unwrap()
                .contains("pricelistCode")
        );
    }

    #[tokio::test]
    async fn add_to_cart_unresolvable_item_is_internal_error() {
        // No vehicle mapping in the catalog
        let mock = MockGateway::new()
            .with_mappings(vec![CapacityMapping {
                capacity_unit_code: Some("P".into()),
                price_category: Some("REGULAR".into()),
                item_code: Some("S01".into()),
                ..Default::default()
            }])
            .with_prices(prices());

        let (status, response) =
            send(app(mock), post_json("/api/add_to_cart", cart_body())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response["error"].as_str().unwrap().contains("M1/REGULAR"));
    }

    #[tokio::test]
    async fn upstream_booking_failure_is_relayed() {
        let mock = MockGateway::new()
            .with_mappings(mappings())
            .with_prices(prices())
            .with_booking_failure(422, r#"{"reason": "sold out"}"#.to_string());

        let (status, response) =
            send(app(mock), post_json("/api/add_to_cart", cart_body())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response["details"]["reason"], "sold out");
    }

    #[tokio::test]
    async fn booking_without_uid_in_confirmation_is_internal_error() {
        let mock = MockGateway::new()
            .with_mappings(mappings())
            .with_prices(prices());
        // No booking UID configured on the mock

        let (status, response) =
            send(app(mock), post_json("/api/add_to_cart", cart_body())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response["error"].as_str().unwrap().contains("UID"));
    }

    #[tokio::test]
    async fn invalid_json_body_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/add_to_cart")
            .header(header::AUTHORIZATION, "Bearer test-token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, response) = send(app(MockGateway::new()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn health_check() {
        let response = app(MockGateway::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
