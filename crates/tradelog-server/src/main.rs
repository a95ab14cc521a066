//! tradelog - ingestion API entry point

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Ingestion API for trading signals, orders, trades and trade events
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long, env = "TRADELOG_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenv::dotenv().ok();

    let args = Args::parse();

    tradelog_telemetry::init_logging()?;

    info!("Starting tradelog v{}", env!("CARGO_PKG_VERSION"));

    let config = tradelog_server::AppConfig::load(args.config.as_deref())?;
    info!(
        backend = ?config.store.backend,
        port = config.api.port,
        "Configuration loaded"
    );

    let app = tradelog_server::Application::new(config)?;
    app.run(tradelog_api::shutdown_signal()).await?;

    Ok(())
}
