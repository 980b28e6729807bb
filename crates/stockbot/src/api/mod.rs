//! Stock data provider abstraction and clients

pub mod models;
pub mod yahoo;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use yahoo::YahooFinanceClient;

/// Market fields for one symbol, fetched fresh for every request
///
/// Every numeric field is either a finite number or `None`; providers drop
/// NaN and infinite values while mapping. Which fields are required is
/// decided by the formatter, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub short_name: Option<String>,
    pub price: Option<f64>,
    pub change: Option<f64>,
    /// Percent change in percentage points (`1.5` means 1.5%)
    pub change_percent: Option<f64>,
    pub volume: Option<u64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    pub profit_margin: Option<f64>,
    /// Company website as supplied by the provider, used for the logo
    pub website: Option<String>,
}

/// Source of quote records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch the current quote for `symbol`
    ///
    /// Unknown symbols, network failures and rate limiting all surface as
    /// errors; callers treat them uniformly.
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteRecord>;
}

/// Keep a value only if it is a finite number
pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
