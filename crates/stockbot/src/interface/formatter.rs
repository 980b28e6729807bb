//! Quote card formatting
//!
//! Turns a quote fetch outcome into a reply. Formatting never fails: a fetch
//! error or a missing required field becomes a plain-text error reply naming
//! the symbol and the cause.

use crate::api::QuoteRecord;
use crate::error::{Result, StockError};
use crate::interface::message::{FlexBubble, FlexComponent, ReplyMessage};
use crate::language::{Labels, Language};
use std::fmt::Display;

/// Logo service keyed by company domain
pub const LOGO_BASE_URL: &str = "https://logo.clearbit.com/";

/// Hero image used when the provider has no website for the company
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/1024x512.png?text=Stock";

/// Shown for optional ratios the provider does not report
pub const MISSING_VALUE: &str = "-";

const PRIMARY_COLOR: &str = "#555555";
const SECONDARY_COLOR: &str = "#aaaaaa";

/// Builds LINE replies for quote requests
#[derive(Debug, Clone, Default)]
pub struct QuoteFormatter {
    language: Language,
}

impl QuoteFormatter {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Format the outcome of a quote fetch for `symbol`
    pub fn format(&self, symbol: &str, outcome: Result<QuoteRecord>) -> ReplyMessage {
        match outcome.and_then(|record| self.format_quote(symbol, &record)) {
            Ok(message) => message,
            Err(err) => self.format_error(symbol, &err),
        }
    }

    /// Build the quote card; fails only when a required field is absent
    pub fn format_quote(&self, symbol: &str, record: &QuoteRecord) -> Result<ReplyMessage> {
        let price = record.price.ok_or(StockError::MissingField("regularMarketPrice"))?;
        let change = record.change.ok_or(StockError::MissingField("regularMarketChange"))?;
        let change_percent = record
            .change_percent
            .ok_or(StockError::MissingField("regularMarketChangePercent"))?;

        let labels: Labels = self.language.labels();
        let name = record.short_name.clone().unwrap_or_else(|| symbol.to_string());
        let volume = record.volume.unwrap_or(0);
        // Always billions, even for small caps
        let market_cap_billions = record.market_cap.unwrap_or(0.0) / 1e9;

        let body = FlexComponent::vertical(vec![
            FlexComponent::bold_text(name, "xl"),
            FlexComponent::text(
                format!("{}: {price:.2} USD", labels.last_price),
                "md",
                Some(PRIMARY_COLOR),
            ),
            FlexComponent::text(
                format!("{}: {change:+.2} ({change_percent:+.2}%)", labels.change),
                "sm",
                Some(SECONDARY_COLOR),
            ),
            FlexComponent::text(
                format!("Volume: {}", format_thousands(volume)),
                "sm",
                Some(SECONDARY_COLOR),
            ),
            FlexComponent::text(
                format!("Market Cap: {market_cap_billions:.2}B"),
                "sm",
                Some(SECONDARY_COLOR),
            ),
            FlexComponent::text(
                format!(
                    "P/E: {}, EPS: {}",
                    format_optional(record.pe_ratio),
                    format_optional(record.eps)
                ),
                "sm",
                Some(SECONDARY_COLOR),
            ),
            FlexComponent::text(
                format!("Profit Margin: {}", format_optional(record.profit_margin)),
                "sm",
                Some(SECONDARY_COLOR),
            ),
        ]);

        let bubble = FlexBubble {
            hero: Some(FlexComponent::hero_image(logo_url(record.website.as_deref()))),
            body: Some(body),
        };

        Ok(ReplyMessage::flex(format!("{symbol} stock info"), bubble))
    }

    /// Plain-text error reply naming the symbol and the cause
    pub fn format_error(&self, symbol: &str, error: &dyn Display) -> ReplyMessage {
        ReplyMessage::text(format!("{} {symbol}\n{error}", self.language.labels().fetch_error))
    }
}

/// Logo image URL for a company website, or the placeholder
pub fn logo_url(website: Option<&str>) -> String {
    website.and_then(website_domain).map_or_else(
        || PLACEHOLDER_IMAGE_URL.to_string(),
        |domain| format!("{LOGO_BASE_URL}{domain}"),
    )
}

/// Domain part of a website value such as `https://www.apple.com/` or `apple.com`
fn website_domain(website: &str) -> Option<String> {
    let website = website.trim();
    if let Ok(url) = url::Url::parse(website) {
        if let Some(host) = url.host_str() {
            return Some(host.to_string());
        }
    }

    let domain = website.split('/').next().unwrap_or_default().trim();
    (!domain.is_empty()).then(|| domain.to_string())
}

/// Group digits in threes: `1234567` becomes `1,234,567`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render an optional ratio in shortest round-trip form, or a dash when absent.
///
/// Whole numbers keep one decimal place (`30.0`). Magnitudes below `1e-4` or
/// from `1e16` up switch to scientific notation with a signed two-digit
/// exponent (`1e-05`, `2.5e+16`).
pub fn format_optional(value: Option<f64>) -> String {
    let Some(value) = value else {
        return MISSING_VALUE.to_string();
    };

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();

    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}
