use super::{MAX_UPLOAD_SIZE_BYTES, SharedState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

pub fn create_app(state: SharedState) -> Router {
    // Configure the router with all API endpoints
    Router::new()
        // File utilities
        .route("/api/compress", post(handlers::create_archive))
        .route("/api/convert-image", post(handlers::convert_image))
        .route("/api/compress-image", post(handlers::compress_image))
        // Currency utilities
        .route("/api/rates/{base}", get(handlers::get_rates))
        .route("/api/convert-currency", get(handlers::convert_currency))
        // Apply a layer to limit the maximum size of request bodies
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE_BYTES))
        // Add CORS layer for broader client compatibility
        .layer(CorsLayer::permissive())
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        // Provide the shared state
        .with_state(state)
}
