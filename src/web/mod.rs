// Web server module
// Handles HTTP API endpoints for archiving, image conversion and currency rates

mod app;
mod archive;
mod error;
mod extract_request_data;
mod handlers;
mod image_codec;
mod listeners;
mod models;

pub use app::create_app;
pub use listeners::create_listener;

use crate::rates::RateClient;
use std::sync::Arc;

// Maximum allowed size for upload requests
pub const MAX_UPLOAD_SIZE_BYTES: usize = 100 * 1024 * 1024; // 100MB

/// Shared state for all handlers.
pub struct AppState {
    pub rate_client: RateClient,
}

pub type SharedState = Arc<AppState>;
