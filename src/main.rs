use lesividad_api::{
    api::{build_router, AppState},
    config::Config,
    model::load_registry,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lesividad_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    tracing::info!("Starting Lesividad API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Artifact directory: {}", config.artifacts.dir.display());

    // Load both model bundles before accepting any traffic. A missing or
    // corrupt artifact keeps the process from ever becoming ready.
    let registry = match load_registry(&config.artifacts) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load model artifacts");
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };
    tracing::info!("Model bundles loaded");

    // Create application state and build the HTTP router
    let app_state = AppState::new(Arc::new(registry));
    let app = build_router(app_state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Prediction:   http://{}/predict", http_addr);
    tracing::info!("   Model info:   http://{}/modelo/info", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
