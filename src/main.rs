use anyhow::Result;
use scrapitdown_mailer::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Initialize tracing and metrics
    let prometheus_handle = telemetry::init(&config.telemetry)?;

    info!(
        service = %config.telemetry.service_name,
        "Starting Scrap It Down mailer"
    );
    info!("HTTP server listening on {}", config.http_addr());

    // Run the server
    server::run(config, prometheus_handle).await
}
