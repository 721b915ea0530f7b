use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ferry_server::praamid::PraamidConfig;
use ferry_server::web::{AppState, DEFAULT_PORTAL_URL, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("PRAAMID_BASE_URL") {
        Ok(url) => PraamidConfig::new().with_base_url(url),
        Err(_) => PraamidConfig::new(),
    };

    let portal_base_url = std::env::var("PRAAMID_PORTAL_URL")
        .unwrap_or_else(|_| DEFAULT_PORTAL_URL.to_string());

    // Auth forwarding is on unless explicitly disabled
    let forward_auth = !matches!(
        std::env::var("FORWARD_AUTH").as_deref(),
        Ok("0") | Ok("false") | Ok("no")
    );
    if !forward_auth {
        tracing::warn!("auth forwarding disabled; upstream calls will be anonymous");
    }

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let state = AppState::new(Arc::new(config), forward_auth, portal_base_url);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Ferry booking adapter listening on http://{addr}");
    tracing::info!("  GET  /health                      - Health check");
    tracing::info!("  GET  /api/get_schedule            - Day schedule for a direction");
    tracing::info!("  GET  /api/check_slot_availability - Car capacity for one sailing");
    tracing::info!("  POST /api/add_to_cart             - Create a booking");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
