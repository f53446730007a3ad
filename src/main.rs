use signal_relay::{run_server, AppConfig, AppState, HttpBrokerClient, TradeRelay};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Setup Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Signal Relay...");

    // Load Configuration
    let config = AppConfig::load()?;
    info!("Loaded Configuration: {:?}", config);
    if !config.broker.ssid.is_configured() {
        warn!("⚠️ Session credential (PO_SSID) is not configured - every trade will be refused");
    }

    let transport = Arc::new(HttpBrokerClient::new(&config.broker)?);
    let relay = TradeRelay::new(&config.broker, transport);
    info!(
        "🏦 Broker: {} (account mode: {})",
        config.broker.base_url,
        relay.account_mode()
    );

    let app_state = Arc::new(AppState {
        relay,
        signal: config.signal.clone(),
    });

    info!("Initializing Webhook Server...");
    run_server(&config.server, app_state).await?;

    Ok(())
}
