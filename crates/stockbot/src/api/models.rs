//! Yahoo Finance quoteSummary response models.
//!
//! Yahoo returns numbers as `{"raw": 123.45, "fmt": "123.45"}` objects, or
//! as empty objects `{}` when no data is available.

use serde::Deserialize;

/// Modules requested from quoteSummary
pub const QUOTE_SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,summaryProfile";

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<YahooApiError>,
}

/// Error object Yahoo embeds in the response body
#[derive(Debug, Deserialize)]
pub struct YahooApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from quoteSummary API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_detail: Option<YahooSummaryDetail>,
    pub default_key_statistics: Option<YahooKeyStatistics>,
    pub summary_profile: Option<YahooSummaryProfile>,
}

/// Price module
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub short_name: Option<String>,
    pub regular_market_price: Option<YahooValue>,
    pub regular_market_change: Option<YahooValue>,
    /// Fraction, not percent: `0.0123` is 1.23%
    pub regular_market_change_percent: Option<YahooValue>,
    pub regular_market_volume: Option<YahooValue>,
    pub market_cap: Option<YahooValue>,
}

/// Summary detail module
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    pub volume: Option<YahooValue>,
    pub market_cap: Option<YahooValue>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<YahooValue>,
}

/// Default key statistics module
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooKeyStatistics {
    pub trailing_eps: Option<YahooValue>,
    pub profit_margins: Option<YahooValue>,
}

/// Summary profile module
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryProfile {
    pub website: Option<String>,
}

/// Numeric value with raw and formatted forms
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YahooValue {
    pub raw: Option<f64>,
}

/// Raw number of an optional Yahoo value
pub fn raw(value: Option<&YahooValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}
