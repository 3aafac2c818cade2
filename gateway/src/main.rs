// Ledger Gateway Service - HTTP front-end for the fabcoin contract
// Validates requests and forwards them to the ledger network through its gateway

use ledger_client::FabricGateway;
use ledger_gateway::{config::Config, create_app, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_line_number(true);
    if config.log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting Ledger Gateway Service");

    let options = config.gateway_options();
    info!(
        "Ledger: channel {} contract {} identity {} (wallet {}, profile {})",
        options.channel,
        options.contract,
        options.identity,
        options.wallet_dir.display(),
        options.network_config.display()
    );

    let connector = Arc::new(FabricGateway::new(options));
    let state = AppState::new(
        connector,
        config.functions.clone(),
        config.ledger.channel.clone(),
        config.ledger.contract.clone(),
    );
    let app = create_app(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Gateway listening on: {}", bind_addr);
    info!("   GET /hello?name=");
    info!("   GET /send?id=&timestamp=&from=&to=&amount=&key=&signature=");
    info!("   GET /get-balance?id=&timestamp=&account=&key=&signature=");
    info!("   GET /account?account=");
    info!("   GET /accounts");
    info!("   GET /health - Health check");
    info!("   GET /metrics - Prometheus metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down ledger gateway");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
