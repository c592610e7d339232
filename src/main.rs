// Main entry point for the filedrop-server application.
// Parses configuration, initializes tracing and the rate client,
// configures the Axum router, and starts the HTTP server.

mod rates;
mod shutdown_signal;
mod web;

use clap::Parser;
use rates::{RateClient, ReqwestRateSource, SourceKind};
use std::sync::Arc;
use tracing::Level;
use url::Url;
use web::AppState;

/// Command line arguments for filedrop-server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "FILEDROP_SERVER_HOST", default_value = "localhost", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "FILEDROP_SERVER_PORT", default_value_t = 6980)]
    port: u16,

    /// Base URL of the primary exchange-rate provider.
    #[arg(
        long,
        env = "FILEDROP_SERVER_RATES_URL",
        default_value = "https://api.exchangerate-api.com/v4/latest/"
    )]
    rates_url: Url,

    /// Base URL of the fallback exchange-rate provider, tried once when the primary fails.
    #[arg(
        long,
        env = "FILEDROP_SERVER_RATES_FALLBACK_URL",
        default_value = "https://open.er-api.com/v6/latest/"
    )]
    rates_fallback_url: Url,
}

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    // Initialize tracing subscriber for structured logging.
    // Logs will go to stdout. Adjust level and format as needed.
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO) // Set to DEBUG for per-field multipart logs
        .with_target(true) // Include module path in logs
        .with_file(true) // Include source file name
        .with_line_number(true) // Include line numbers
        .init();

    tracing::info!("Starting filedrop-server...");
    tracing::info!(
        "Rate providers: primary={}, fallback={}",
        config.rates_url,
        config.rates_fallback_url
    );

    // --- Initialize the exchange-rate client ---
    let rate_client = match (
        ReqwestRateSource::new(config.rates_url.clone(), SourceKind::Primary),
        ReqwestRateSource::new(config.rates_fallback_url.clone(), SourceKind::Fallback),
    ) {
        (Ok(primary), Ok(fallback)) => RateClient::new(Box::new(primary), Box::new(fallback)),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("FATAL: Failed to initialize rate client: {}", e);
            eprintln!("FATAL: Rate client initialization failed. Error: {e}. Exiting.");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState { rate_client });

    // --- Build Axum Application Router ---
    let app = web::create_app(state);
    tracing::info!("Axum router configured.");

    // --- Start HTTP Server ---
    let listener = match web::create_listener(&config.host, config.port).await {
        Ok((addr, l)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            eprintln!("FATAL: Could not bind server. Error: {e}. Exiting.");
            std::process::exit(1);
        }
    };

    // Run the server.
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal::shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {e}");
    }

    tracing::info!("filedrop-server has shut down.");
}
