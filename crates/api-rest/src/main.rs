//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `ward-run` binary serves the
//! same router with the same configuration.

use api_rest::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ward_core::WardConfig;

/// Main entry point for the ward REST API server
///
/// # Environment Variables
/// - `WARD_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `WARD_SEED`, `WARD_PATIENT_COUNT`, `WARD_BED_LAYOUT`: synthetic dataset configuration
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the dataset cannot be built,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("ward=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("WARD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting ward REST API on {}", addr);

    let config = WardConfig::from_env_values(
        std::env::var("WARD_SEED").ok(),
        std::env::var("WARD_PATIENT_COUNT").ok(),
        std::env::var("WARD_BED_LAYOUT").ok(),
    )?;
    let state = AppState::seeded(&config, chrono::Utc::now().date_naive())?;

    api_rest::serve(&addr, state).await?;

    Ok(())
}
