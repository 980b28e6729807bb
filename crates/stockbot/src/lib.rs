//! LINE stock quote bot
//!
//! Receives LINE webhook deliveries, answers `/stock <symbol>` style commands
//! with a Flex card built from Yahoo Finance data, and replies through the
//! LINE Messaging API.
//!
//! - [`bot::Command`] parses message text into a quote request
//! - [`interface::QuoteFormatter`] turns a quote (or a failure) into a reply
//! - [`bot::StockBot`] runs one webhook delivery end to end
//! - [`server::router`] exposes `POST /callback` and `GET /health`
//!
//! The messaging platform and the data provider sit behind the
//! [`MessagingPlatform`] and [`QuoteProvider`] traits, so both can be swapped
//! for fakes in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockbot::{BotConfig, LineClient, StockBot, YahooFinanceClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let bot = StockBot::new(
//!         Arc::new(LineClient::new((&config).into())?),
//!         Arc::new(YahooFinanceClient::from_config(&config)?),
//!         &config,
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind(config.listen_address()).await?;
//!     stockbot::server::serve(listener, bot, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod interface;
pub mod language;
pub mod platforms;
pub mod server;

// Re-export main types for convenience
pub use api::{QuoteProvider, QuoteRecord, YahooFinanceClient};
pub use bot::{Command, StockBot, WebhookOutcome};
pub use config::BotConfig;
pub use error::{Result, StockError};
pub use interface::{QuoteFormatter, ReplyMessage};
pub use language::Language;
pub use platforms::{InboundMessage, LineClient, LineConfig, MessagingPlatform};
