//! GivingZone HTTP Server
//!
//! Main entry point for the discovery API server.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use infrastructure::{AppConfig, build_services, init_logging};
use presentation_http::{create_router, set_expose_internal_errors, state::AppState};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    map_response_body::MapResponseBodyLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_result = AppConfig::load();
    let config = config_result.as_ref().cloned().unwrap_or_default();

    init_logging(
        config.server.log_format,
        "givingzone_server=info,presentation_http=info,application=info,infrastructure=info,tower_http=info",
    )?;

    info!("GivingZone v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = &config_result {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    info!(
        environment = %config.environment,
        host = %config.server.host,
        port = config.server.port,
        mirrors = config.overpass.mirrors.len(),
        "Configuration loaded"
    );

    set_expose_internal_errors(config.expose_error_details());

    let services = build_services(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize discovery services: {e}"))?;

    let app = create_router(AppState::new(services.coordinator));

    let cors_layer = if config.server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers(Any)
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer)
            .layer(MapResponseBodyLayer::new(axum::body::Body::new))
            .layer(RequestBodyLimitLayer::new(
                config.server.max_body_size_json_bytes,
            )),
    );

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
