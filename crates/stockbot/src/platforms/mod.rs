//! Messaging platform abstraction and implementations

pub mod line;

use crate::error::Result;
use crate::interface::ReplyMessage;
use async_trait::async_trait;

pub use line::{LineClient, LineConfig};

/// Text message decoded from a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Message text as typed by the user
    pub text: String,
    /// One-time handle for replying to this message
    pub reply_token: String,
}

impl InboundMessage {
    pub fn new(text: impl Into<String>, reply_token: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_token: reply_token.into(),
        }
    }
}

/// Messaging platform the bot receives webhooks from and replies through
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingPlatform: Send + Sync {
    /// Check the webhook signature header against the raw body
    fn verify_signature(&self, body: &[u8], signature: &str) -> Result<()>;

    /// Decode a verified webhook body into text messages.
    ///
    /// Events that are not text messages are skipped.
    fn parse_events(&self, body: &[u8]) -> Result<Vec<InboundMessage>>;

    /// Send `message` as the reply to the event owning `reply_token`
    async fn reply(&self, reply_token: &str, message: &ReplyMessage) -> Result<()>;
}
