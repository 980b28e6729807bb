//! Stock quote bot
//!
//! Ties the pieces together for one webhook delivery: verify the signature,
//! decode text messages, parse each into a [`Command`], fetch and format the
//! quote, and reply once per recognized command.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockbot::bot::StockBot;
//! use stockbot::{BotConfig, LineClient, YahooFinanceClient};
//! use std::sync::Arc;
//!
//! let config = BotConfig::from_env()?;
//! let bot = StockBot::new(
//!     Arc::new(LineClient::new((&config).into())?),
//!     Arc::new(YahooFinanceClient::from_config(&config)?),
//!     &config,
//! );
//! let outcome = bot.handle_webhook(body, signature).await?;
//! ```

pub mod commands;

use crate::api::QuoteProvider;
use crate::config::BotConfig;
use crate::error::Result;
use crate::interface::{QuoteFormatter, ReplyMessage};
use crate::platforms::{InboundMessage, MessagingPlatform};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub use commands::Command;

/// Counts for one processed webhook delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebhookOutcome {
    /// Text messages decoded from the body
    pub messages: usize,
    /// Replies the platform accepted
    pub replies_sent: usize,
    /// Replies the platform rejected or that failed in transit
    pub replies_failed: usize,
}

/// Webhook-driven stock quote bot
#[derive(Clone)]
pub struct StockBot {
    platform: Arc<dyn MessagingPlatform>,
    provider: Arc<dyn QuoteProvider>,
    formatter: QuoteFormatter,
    fallback_symbol: String,
}

impl StockBot {
    /// Create a bot from its collaborators
    pub fn new(
        platform: Arc<dyn MessagingPlatform>,
        provider: Arc<dyn QuoteProvider>,
        config: &BotConfig,
    ) -> Self {
        Self {
            platform,
            provider,
            formatter: QuoteFormatter::new(config.language.clone()),
            fallback_symbol: config.fallback_symbol.clone(),
        }
    }

    /// Build the reply for one message, or `None` if it is not a command
    pub async fn respond(&self, text: &str) -> Option<ReplyMessage> {
        let command = Command::parse(text, &self.fallback_symbol);
        let Command::Quote { symbol } = command else {
            debug!("Ignoring non-command message");
            return None;
        };

        info!(%symbol, "Quote requested");
        let outcome = self.provider.fetch_quote(&symbol).await;
        if let Err(err) = &outcome {
            warn!(%symbol, error = %err, "Quote fetch failed");
        }

        Some(self.formatter.format(&symbol, outcome))
    }

    /// Process one webhook delivery.
    ///
    /// Only a bad signature is an error. Undecodable bodies, fetch failures
    /// and reply failures are logged and reflected in the outcome.
    pub async fn handle_webhook(&self, body: &[u8], signature: &str) -> Result<WebhookOutcome> {
        self.platform.verify_signature(body, signature)?;

        let messages = match self.platform.parse_events(body) {
            Ok(messages) => messages,
            Err(err) => {
                warn!(error = %err, "Discarding undecodable webhook body");
                return Ok(WebhookOutcome::default());
            }
        };

        let mut outcome = WebhookOutcome {
            messages: messages.len(),
            ..WebhookOutcome::default()
        };

        for message in &messages {
            match self.handle_message(message).await {
                Some(true) => outcome.replies_sent += 1,
                Some(false) => outcome.replies_failed += 1,
                None => {}
            }
        }

        debug!(?outcome, "Webhook processed");
        Ok(outcome)
    }

    /// Reply to one message; `None` when nothing was sent
    async fn handle_message(&self, message: &InboundMessage) -> Option<bool> {
        let reply = self.respond(&message.text).await?;

        match self.platform.reply(&message.reply_token, &reply).await {
            Ok(()) => Some(true),
            Err(err) => {
                error!(error = %err, "Failed to send reply");
                Some(false)
            }
        }
    }
}
