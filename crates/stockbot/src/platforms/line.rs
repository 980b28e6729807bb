//! LINE Messaging API client
//!
//! Verifies `X-Line-Signature` (base64 HMAC-SHA256 of the raw body keyed by
//! the channel secret), decodes webhook deliveries and calls the reply API.

use crate::config::BotConfig;
use crate::error::{Result, StockError};
use crate::interface::ReplyMessage;
use crate::platforms::{InboundMessage, MessagingPlatform};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// LINE channel configuration
#[derive(Clone)]
pub struct LineConfig {
    /// Channel access token for the reply API
    pub channel_access_token: String,

    /// Channel secret for webhook signatures
    pub channel_secret: String,

    /// API base URL
    pub api_base: String,

    /// Timeout for reply API calls
    pub timeout: Duration,
}

impl From<&BotConfig> for LineConfig {
    fn from(config: &BotConfig) -> Self {
        Self {
            channel_access_token: config.channel_access_token.clone(),
            channel_secret: config.channel_secret.clone(),
            api_base: config.line_api_base.clone(),
            timeout: config.request_timeout,
        }
    }
}

/// LINE Messaging API client
pub struct LineClient {
    config: LineConfig,
    http: reqwest::Client,
}

impl LineClient {
    /// Create a new client
    pub fn new(config: LineConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    fn reply_url(&self) -> String {
        format!("{}/v2/bot/message/reply", self.config.api_base.trim_end_matches('/'))
    }
}

/// Compute the signature LINE sends for `body`
pub fn sign(channel_secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = new_mac(channel_secret)?;
    mac.update(body);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

fn new_mac(channel_secret: &str) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|e| StockError::ConfigError(format!("invalid channel secret: {e}")))
}

/// Webhook request body
#[derive(Debug, Deserialize)]
struct WebhookBody {
    #[serde(default)]
    events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WebhookEvent {
    Message {
        #[serde(rename = "replyToken")]
        reply_token: Option<String>,
        message: EventMessage,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum EventMessage {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [&'a ReplyMessage; 1],
}

#[async_trait]
impl MessagingPlatform for LineClient {
    fn verify_signature(&self, body: &[u8], signature: &str) -> Result<()> {
        let expected = BASE64
            .decode(signature.trim())
            .map_err(|_| {
                StockError::InvalidSignature("signature is not valid base64".to_string())
            })?;

        let mut mac = new_mac(&self.config.channel_secret)?;
        mac.update(body);
        mac.verify_slice(&expected)
            .map_err(|_| StockError::InvalidSignature("signature mismatch".to_string()))
    }

    fn parse_events(&self, body: &[u8]) -> Result<Vec<InboundMessage>> {
        let body: WebhookBody = serde_json::from_slice(body)
            .map_err(|e| StockError::InvalidPayload(e.to_string()))?;

        let messages = body
            .events
            .into_iter()
            .filter_map(|event| match event {
                WebhookEvent::Message {
                    reply_token: Some(reply_token),
                    message: EventMessage::Text { text },
                } => Some(InboundMessage { text, reply_token }),
                _ => None,
            })
            .collect();

        Ok(messages)
    }

    async fn reply(&self, reply_token: &str, message: &ReplyMessage) -> Result<()> {
        let request = ReplyRequest {
            reply_token,
            messages: [message],
        };

        let response = self
            .http
            .post(self.reply_url())
            .bearer_auth(&self.config.channel_access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StockError::LineApiError {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Reply sent");
        Ok(())
    }
}
