// src/main.rs
use anyhow::Result;
use tracing::info;

use status_probe::client::ApiClient;
use status_probe::config;
use status_probe::probe::{ConnectivityProbe, ConnectivityState};
use status_probe::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("status_probe=info".parse()?)
                .add_directive("hyper=warn".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    // Start the bundled dev backend if configured
    if let Some(backend) = &config.backend {
        server::start_health_backend(
            backend.addr,
            config.api.health_path.clone(),
            backend.status.clone(),
        )
        .await?;
    }

    // Run the one-shot connectivity probe
    let health_path = config.api.health_path.clone();
    let client = ApiClient::new(config.api)?;
    let probe = ConnectivityProbe::new(client, health_path);

    println!("{}", render(probe.state().await));
    let report = probe.run().await;
    println!("{}", render(report.state));

    info!(
        state = %report.state,
        response_time_ms = report.response_time_ms,
        checked_at = %report.checked_at,
        "probe finished"
    );

    if report.state != ConnectivityState::Connected {
        std::process::exit(1);
    }
    Ok(())
}

/// Terminal rendering of the indicator. Presentation only.
fn render(state: ConnectivityState) -> &'static str {
    match state {
        ConnectivityState::Loading => "  ~ Checking backend...",
        ConnectivityState::Connected => "  * Connected to backend",
        ConnectivityState::Disconnected => "  x Backend unreachable",
    }
}
