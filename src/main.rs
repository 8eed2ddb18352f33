use api_rest::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ward_core::WardConfig;

/// Main entry point for the maternity ward application
///
/// Seeds an in-memory record store with a synthetic dataset and serves the REST API
/// (with Swagger UI at `/swagger-ui`) until interrupted.
///
/// # Environment Variables
/// - `WARD_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `WARD_SEED`: synthetic dataset seed (default: 42)
/// - `WARD_PATIENT_COUNT`: synthetic patient count, 1 to 500 (default: 50)
/// - `WARD_BED_LAYOUT`: optional YAML bed layout replacing the default fifty beds
///
/// # Returns
/// * `Ok(())` - If the server runs and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, seeding or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ward=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("WARD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = WardConfig::from_env_values(
        std::env::var("WARD_SEED").ok(),
        std::env::var("WARD_PATIENT_COUNT").ok(),
        std::env::var("WARD_BED_LAYOUT").ok(),
    )?;
    tracing::info!(
        seed = config.seed(),
        patients = config.patient_count(),
        beds = config.beds().len(),
        "++ Ward configuration resolved"
    );

    let state = AppState::seeded(&config, chrono::Utc::now().date_naive())?;

    tracing::info!("++ Starting ward REST on {}", rest_addr);

    tokio::select! {
        served = api_rest::serve(&rest_addr, state) => served?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("-- Shutting down");
        }
    }

    Ok(())
}
