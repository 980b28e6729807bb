//! LINE stock quote bot server
//!
//! # Usage
//!
//! ```bash
//! export LINE_CHANNEL_ACCESS_TOKEN="..."
//! export LINE_CHANNEL_SECRET="..."
//! export PORT=8000
//!
//! cargo run --bin stock-bot -p stockbot
//! ```
//!
//! Variables can also be placed in a `.env` file in the working directory.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use stockbot::{BotConfig, LineClient, StockBot, YahooFinanceClient};
use stockbot_utils::LogFormat;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-bot")]
#[command(about = "LINE webhook bot answering stock quote commands", long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides BIND_ADDRESS)
    #[arg(short, long)]
    bind: Option<String>,

    /// Log output format: pretty or json (overrides LOG_FORMAT)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_format = match args.log_format {
        Some(format) => format,
        None => stockbot_utils::env_parse("LOG_FORMAT")?.unwrap_or_default(),
    };
    stockbot_utils::init_tracing(log_format);

    let mut config = BotConfig::from_env().context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    info!(
        fallback_symbol = %config.fallback_symbol,
        language = %config.language,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting stock bot"
    );

    let platform =
        LineClient::new((&config).into()).context("failed to build LINE client")?;
    let provider =
        YahooFinanceClient::from_config(&config).context("failed to build Yahoo client")?;
    let bot = StockBot::new(Arc::new(platform), Arc::new(provider), &config);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    stockbot::server::serve(listener, bot, shutdown_signal()).await?;

    info!("Stock bot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
