//! ShareDesk API Server
//!
//! Main entry point for the ShareDesk backend service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sharedesk_api::{AppState, create_router};
use sharedesk_client::ApiClient;
use sharedesk_core::ledger::DisplayOptions;
use sharedesk_shared::{AppConfig, LogConfig};

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sharedesk=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log);

    // Upstream client, anonymous until a handler attaches the caller's token
    let upstream = ApiClient::new(&config.upstream)?;
    info!(
        base_url = %upstream.base_url(),
        timeout_secs = config.upstream.timeout_secs,
        "Upstream API configured"
    );

    let display_opts = DisplayOptions::from_config(&config.display).map_err(anyhow::Error::msg)?;
    info!(
        timezone = %display_opts.timezone(),
        date_format = %config.display.date_format,
        "Display options configured"
    );

    // Create router
    let app = create_router(AppState::new(upstream, display_opts));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
