//! Configuration for the stock bot

use crate::bot::Command;
use crate::error::{Result, StockError};
use crate::language::Language;
use std::fmt;
use std::time::Duration;
use stockbot_utils::{env_or, env_parse, env_required};

/// Symbol quoted when a command carries no ticker
pub const DEFAULT_FALLBACK_SYMBOL: &str = "PLTR";

/// LINE Messaging API base URL
pub const DEFAULT_LINE_API_BASE: &str = "https://api.line.me";

/// Yahoo Finance query API base URL
pub const DEFAULT_YAHOO_API_BASE: &str = "https://query1.finance.yahoo.com";

/// Yahoo endpoint that hands out the session cookie paired with a crumb
pub const DEFAULT_YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

/// Configuration for the webhook bot
#[derive(Clone)]
pub struct BotConfig {
    /// LINE channel access token used for the reply API
    pub channel_access_token: String,

    /// LINE channel secret used to verify webhook signatures
    pub channel_secret: String,

    /// Address the HTTP server binds to
    pub bind_address: String,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Symbol used for `/` and `/stock` without a ticker
    pub fallback_symbol: String,

    /// Timeout applied to every outbound HTTP call
    pub request_timeout: Duration,

    /// Language of reply labels
    pub language: Language,

    /// LINE Messaging API base URL
    pub line_api_base: String,

    /// Yahoo Finance API base URL
    pub yahoo_api_base: String,

    /// Yahoo session cookie URL
    pub yahoo_cookie_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            channel_access_token: String::new(),
            channel_secret: String::new(),
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            fallback_symbol: DEFAULT_FALLBACK_SYMBOL.to_string(),
            request_timeout: Duration::from_secs(10),
            language: Language::default(),
            line_api_base: DEFAULT_LINE_API_BASE.to_string(),
            yahoo_api_base: DEFAULT_YAHOO_API_BASE.to_string(),
            yahoo_cookie_url: DEFAULT_YAHOO_COOKIE_URL.to_string(),
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("channel_access_token", &"<redacted>")
            .field("channel_secret", &"<redacted>")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("fallback_symbol", &self.fallback_symbol)
            .field("request_timeout", &self.request_timeout)
            .field("language", &self.language)
            .field("line_api_base", &self.line_api_base)
            .field("yahoo_api_base", &self.yahoo_api_base)
            .field("yahoo_cookie_url", &self.yahoo_cookie_url)
            .finish()
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// `LINE_CHANNEL_ACCESS_TOKEN` and `LINE_CHANNEL_SECRET` are required.
    /// `PORT`, `BIND_ADDRESS`, `DEFAULT_SYMBOL`, `REQUEST_TIMEOUT_SECS`,
    /// `BOT_LANGUAGE`, `LINE_API_BASE`, `YAHOO_API_BASE` and
    /// `YAHOO_COOKIE_URL` are optional.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            channel_access_token: env_required("LINE_CHANNEL_ACCESS_TOKEN")?,
            channel_secret: env_required("LINE_CHANNEL_SECRET")?,
            bind_address: env_or("BIND_ADDRESS", &defaults.bind_address),
            port: env_parse("PORT")?.unwrap_or(defaults.port),
            fallback_symbol: env_or("DEFAULT_SYMBOL", &defaults.fallback_symbol).to_uppercase(),
            request_timeout: env_parse::<u64>("REQUEST_TIMEOUT_SECS")?
                .map_or(defaults.request_timeout, Duration::from_secs),
            language: Language::from_code(&env_or("BOT_LANGUAGE", defaults.language.code())),
            line_api_base: env_or("LINE_API_BASE", &defaults.line_api_base),
            yahoo_api_base: env_or("YAHOO_API_BASE", &defaults.yahoo_api_base),
            yahoo_cookie_url: env_or("YAHOO_COOKIE_URL", &defaults.yahoo_cookie_url),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.channel_access_token.trim().is_empty() {
            return Err(StockError::ConfigError(
                "LINE channel access token must not be empty".to_string(),
            ));
        }

        if self.channel_secret.trim().is_empty() {
            return Err(StockError::ConfigError(
                "LINE channel secret must not be empty".to_string(),
            ));
        }

        if self.fallback_symbol.trim().is_empty() {
            return Err(StockError::ConfigError(
                "fallback symbol must not be empty".to_string(),
            ));
        }

        let reparsed = Command::parse(&format!("/{}", self.fallback_symbol), "");
        if reparsed.symbol() != Some(self.fallback_symbol.as_str()) {
            return Err(StockError::ConfigError(format!(
                "fallback symbol must be a single upper-case ticker, got {:?}",
                self.fallback_symbol
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    channel_access_token: Option<String>,
    channel_secret: Option<String>,
    bind_address: Option<String>,
    port: Option<u16>,
    fallback_symbol: Option<String>,
    request_timeout: Option<Duration>,
    language: Option<Language>,
    line_api_base: Option<String>,
    yahoo_api_base: Option<String>,
    yahoo_cookie_url: Option<String>,
}

impl BotConfigBuilder {
    /// Set the LINE channel access token
    pub fn channel_access_token(mut self, token: impl Into<String>) -> Self {
        self.channel_access_token = Some(token.into());
        self
    }

    /// Set the LINE channel secret
    pub fn channel_secret(mut self, secret: impl Into<String>) -> Self {
        self.channel_secret = Some(secret.into());
        self
    }

    /// Set the bind address
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = Some(address.into());
        self
    }

    /// Set the listening port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the fallback symbol
    pub fn fallback_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.fallback_symbol = Some(symbol.into().to_uppercase());
        self
    }

    /// Set the outbound request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the reply language
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Override the LINE API base URL
    pub fn line_api_base(mut self, url: impl Into<String>) -> Self {
        self.line_api_base = Some(url.into());
        self
    }

    /// Override the Yahoo Finance API base URL
    pub fn yahoo_api_base(mut self, url: impl Into<String>) -> Self {
        self.yahoo_api_base = Some(url.into());
        self
    }

    /// Override the Yahoo session cookie URL
    pub fn yahoo_cookie_url(mut self, url: impl Into<String>) -> Self {
        self.yahoo_cookie_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let defaults = BotConfig::default();

        let config = BotConfig {
            channel_access_token: self
                .channel_access_token
                .unwrap_or(defaults.channel_access_token),
            channel_secret: self.channel_secret.unwrap_or(defaults.channel_secret),
            bind_address: self.bind_address.unwrap_or(defaults.bind_address),
            port: self.port.unwrap_or(defaults.port),
            fallback_symbol: self.fallback_symbol.unwrap_or(defaults.fallback_symbol),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            language: self.language.unwrap_or(defaults.language),
            line_api_base: self.line_api_base.unwrap_or(defaults.line_api_base),
            yahoo_api_base: self.yahoo_api_base.unwrap_or(defaults.yahoo_api_base),
            yahoo_cookie_url: self.yahoo_cookie_url.unwrap_or(defaults.yahoo_cookie_url),
        };

        config.validate()?;
        Ok(config)
    }
}
