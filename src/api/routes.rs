use crate::api::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Welcome and liveness
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Model description
        .route("/modelo/info", get(handlers::modelo_info))
        // Prediction
        .route("/predict", post(handlers::predict))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
}
