use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bus_server::datasets::{DatasetConfig, DatasetSource};
use bus_server::service::TransitService;
use bus_server::thebus::{ProxyConfig, ReqwestTransport, TransitClient, TransitConfig};
use bus_server::web::{AppState, create_router};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DATASET_DIR: &str = "data";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The credential is per request; only endpoints come from the environment.
    let mut transit_config = TransitConfig::new();
    if let Ok(base) = std::env::var("THEBUS_API_BASE") {
        transit_config = transit_config.with_base_url(base);
    }
    if let Ok(relay) = std::env::var("CORS_RELAY_URL") {
        transit_config = transit_config.with_proxy(ProxyConfig::default().with_relay_url(relay));
    }

    let transport = ReqwestTransport::new(transit_config.timeout_secs.map(Duration::from_secs))
        .expect("Failed to create HTTP transport");
    let client =
        TransitClient::new(transit_config, transport).expect("Failed to create transit client");

    let data_dir = std::env::var("DATASET_DIR").unwrap_or_else(|_| DEFAULT_DATASET_DIR.to_string());
    let source = match std::env::var("DATASET_BASE_URL") {
        Ok(base) => DatasetSource::http(&base).expect("Invalid DATASET_BASE_URL"),
        Err(_) => DatasetSource::directory(&data_dir),
    };

    let state = AppState::new(TransitService::new(client, source, DatasetConfig::default()));

    // Load datasets in the background so the first nearby query is fast.
    let warm_state = state.clone();
    tokio::spawn(async move {
        match warm_state.service.datasets().warm().await {
            Ok(()) => info!("datasets loaded"),
            Err(e) => warn!(error = %e, "dataset warm-up failed; will retry on demand"),
        }
    });

    let app = create_router(state, &data_dir);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    info!("Bus tracker listening on http://{addr}");
    info!("  GET  /health");
    info!("  GET  /api/routes?route=&headsign=");
    info!("  GET  /api/routes/:route/shape");
    info!("  GET  /api/routes/:route/stops");
    info!("  GET  /api/vehicles?num=");
    info!("  GET  /api/arrivals?stop=");
    info!("  GET  /api/stops/nearby?lat=&lon=&k=");
    info!("  GET  /data/*");

    axum::serve(listener, app).await.expect("Server error");
}
