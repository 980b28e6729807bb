//! Yahoo Finance quoteSummary client
//!
//! quoteSummary needs a cookie and a matching crumb. Both are fetched lazily,
//! kept on the client, and dropped when Yahoo answers 401.

use crate::api::models::{
    QUOTE_SUMMARY_MODULES, YahooQuoteSummaryResponse, YahooQuoteSummaryResult, raw,
};
use crate::api::{QuoteProvider, QuoteRecord, finite};
use crate::config::{BotConfig, DEFAULT_YAHOO_API_BASE, DEFAULT_YAHOO_COOKIE_URL};
use crate::error::{Result, StockError};
use async_trait::async_trait;
use reqwest::{StatusCode, header};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct Crumb {
    cookie: String,
    value: String,
}

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    http: reqwest::Client,
    base_url: Url,
    cookie_url: Url,
    crumb: RwLock<Option<Crumb>>,
}

impl YahooFinanceClient {
    /// Create a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_endpoints(DEFAULT_YAHOO_API_BASE, DEFAULT_YAHOO_COOKIE_URL, timeout)
    }

    /// Create a client against custom API and cookie URLs
    pub fn with_endpoints(base_url: &str, cookie_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_url(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(StockError::ConfigError(format!(
                "Yahoo API base URL cannot hold a path: {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            cookie_url: parse_url(cookie_url)?,
            crumb: RwLock::new(None),
        })
    }

    /// Create a client from bot configuration
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::with_endpoints(
            &config.yahoo_api_base,
            &config.yahoo_cookie_url,
            config.request_timeout,
        )
    }

    /// API URL with `segments` appended as percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn ensure_crumb(&self) -> Result<Crumb> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = self.fetch_crumb().await?;
        *self.crumb.write().await = Some(crumb.clone());
        Ok(crumb)
    }

    async fn fetch_crumb(&self) -> Result<Crumb> {
        debug!("Fetching Yahoo authentication crumb");

        // fc.yahoo.com answers 404 but still sets the session cookie
        let response = self.http.get(self.cookie_url.clone()).send().await?;
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(';').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                StockError::YahooFinanceError("Failed to parse Yahoo cookie".to_string())
            })?;

        let response = self
            .http
            .get(self.endpoint(&["v1", "test", "getcrumb"]))
            .header(header::COOKIE, &cookie)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StockError::YahooFinanceError(format!(
                "Failed to get crumb: HTTP {}",
                response.status()
            )));
        }

        let value = response.text().await?.trim().to_string();
        if value.is_empty() {
            return Err(StockError::YahooFinanceError(
                "Yahoo returned an empty crumb".to_string(),
            ));
        }

        Ok(Crumb { cookie, value })
    }

    async fn clear_crumb(&self) {
        *self.crumb.write().await = None;
    }

    async fn fetch_summary(&self, symbol: &str) -> Result<YahooQuoteSummaryResult> {
        let crumb = self.ensure_crumb().await?;

        let url = self.endpoint(&["v10", "finance", "quoteSummary", symbol]);
        let response = self
            .http
            .get(url)
            .query(&[
                ("modules", QUOTE_SUMMARY_MODULES),
                ("crumb", crumb.value.as_str()),
            ])
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.clear_crumb().await;
                return Err(StockError::YahooFinanceError(
                    "Yahoo authentication expired".to_string(),
                ));
            }
            StatusCode::NOT_FOUND => return Err(StockError::SymbolNotFound(symbol.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(StockError::YahooFinanceError(
                    "Rate limited by Yahoo".to_string(),
                ));
            }
            _ => {}
        }

        let status = response.status();
        if !status.is_success() {
            return Err(StockError::YahooFinanceError(format!("HTTP {status}")));
        }

        let body: YahooQuoteSummaryResponse = response.json().await?;
        first_result(symbol, body)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| StockError::ConfigError(format!("Invalid Yahoo URL {url}: {e}")))
}

fn first_result(
    symbol: &str,
    body: YahooQuoteSummaryResponse,
) -> Result<YahooQuoteSummaryResult> {
    if let Some(error) = body.quote_summary.error {
        let description = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "unknown error".to_string());
        warn!(symbol, %description, "Yahoo returned an error");
        return Err(StockError::SymbolNotFound(format!("{symbol}: {description}")));
    }

    body.quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| StockError::SymbolNotFound(symbol.to_string()))
}

/// Map a quoteSummary result to a quote record.
///
/// The price module wins over summaryDetail where both carry a field.
/// Yahoo reports percent change as a fraction; the record holds percent.
pub(crate) fn map_summary(result: YahooQuoteSummaryResult) -> QuoteRecord {
    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let stats = result.default_key_statistics.unwrap_or_default();
    let profile = result.summary_profile.unwrap_or_default();

    let volume = finite(raw(price.regular_market_volume.as_ref()))
        .or_else(|| finite(raw(detail.volume.as_ref())))
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64);

    QuoteRecord {
        short_name: price.short_name.filter(|n| !n.trim().is_empty()),
        price: finite(raw(price.regular_market_price.as_ref())),
        change: finite(raw(price.regular_market_change.as_ref())),
        change_percent: finite(raw(price.regular_market_change_percent.as_ref()))
            .map(|f| f * 100.0),
        volume,
        market_cap: finite(raw(price.market_cap.as_ref()))
            .or_else(|| finite(raw(detail.market_cap.as_ref()))),
        pe_ratio: finite(raw(detail.trailing_pe.as_ref())),
        eps: finite(raw(stats.trailing_eps.as_ref())),
        profit_margin: finite(raw(stats.profit_margins.as_ref())),
        website: profile.website.filter(|w| !w.trim().is_empty()),
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceClient {
    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteRecord> {
        debug!(symbol, "Fetching quote from Yahoo Finance");
        let result = self.fetch_summary(symbol).await?;
        Ok(map_summary(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> YahooQuoteSummaryResponse {
        serde_json::from_str(json).unwrap()
    }

    const NVDA: &str = r#"{
        "quoteSummary": {
            "result": [{
                "price": {
                    "shortName": "NVIDIA Corporation",
                    "currency": "USD",
                    "regularMarketPrice": {"raw": 118.11, "fmt": "118.11"},
                    "regularMarketChange": {"raw": -2.345, "fmt": "-2.35"},
                    "regularMarketChangePercent": {"raw": -0.01947, "fmt": "-1.95%"},
                    "regularMarketVolume": {"raw": 231514900, "fmt": "231.51M"},
                    "marketCap": {"raw": 2897000000000, "fmt": "2.9T"}
                },
                "summaryDetail": {
                    "trailingPE": {"raw": 46.5, "fmt": "46.50"},
                    "volume": {"raw": 1, "fmt": "1"}
                },
                "defaultKeyStatistics": {
                    "trailingEps": {"raw": 2.54, "fmt": "2.54"},
                    "profitMargins": {"raw": 0.5577, "fmt": "55.77%"}
                },
                "summaryProfile": {"website": "https://www.nvidia.com", "sector": "Technology"}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_map_full_summary() {
        let result = first_result("NVDA", parse(NVDA)).unwrap();
        let record = map_summary(result);

        assert_eq!(record.short_name.as_deref(), Some("NVIDIA Corporation"));
        assert_eq!(record.price, Some(118.11));
        assert_eq!(record.change, Some(-2.345));
        let percent = record.change_percent.unwrap();
        assert!((percent - -1.947).abs() < 1e-9);
        assert_eq!(record.volume, Some(231_514_900));
        assert_eq!(record.market_cap, Some(2_897_000_000_000.0));
        assert_eq!(record.pe_ratio, Some(46.5));
        assert_eq!(record.eps, Some(2.54));
        assert_eq!(record.profit_margin, Some(0.5577));
        assert_eq!(record.website.as_deref(), Some("https://www.nvidia.com"));
    }

    #[test]
    fn test_map_sparse_summary() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {"regularMarketPrice": {"raw": 10.0}, "shortName": " "},
                    "summaryDetail": {
                        "trailingPE": {},
                        "volume": {"raw": 500},
                        "marketCap": {"raw": 1.0e9}
                    }
                }]
            }
        }"#;
        let record = map_summary(first_result("XYZ", parse(json)).unwrap());

        assert_eq!(record.price, Some(10.0));
        assert_eq!(record.change, None);
        assert_eq!(record.change_percent, None);
        assert_eq!(record.short_name, None);
        assert_eq!(record.volume, Some(500));
        assert_eq!(record.market_cap, Some(1.0e9));
        assert_eq!(record.pe_ratio, None);
        assert_eq!(record.website, None);
    }

    #[test]
    fn test_error_body_is_symbol_not_found() {
        let json = r#"{
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found for symbol: NOPE"}
            }
        }"#;
        let err = first_result("NOPE", parse(json)).unwrap_err();
        assert!(matches!(err, StockError::SymbolNotFound(ref msg) if msg.contains("NOPE")));
    }

    #[test]
    fn test_empty_result_is_symbol_not_found() {
        let json = r#"{"quoteSummary": {"result": []}}"#;
        let err = first_result("NOPE", parse(json)).unwrap_err();
        assert!(matches!(err, StockError::SymbolNotFound(_)));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_quote_live() {
        let client = YahooFinanceClient::new(Duration::from_secs(10)).unwrap();
        let record = client.fetch_quote("AAPL").await.unwrap();
        assert!(record.price.unwrap() > 0.0);
    }

    mod http {
        use super::super::*;
        use axum::Router;
        use axum::extract::{Path, RawQuery, State};
        use axum::http::HeaderMap;
        use axum::response::{IntoResponse, Response};
        use axum::routing::get;
        use serde_json::json;
        use std::collections::VecDeque;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::{Arc, Mutex};
        use tokio_test::assert_ok;

        const SESSION_COOKIE: &str = "A3=session";

        /// Local stand-in for the cookie, crumb and quoteSummary endpoints
        #[derive(Default)]
        struct FakeYahoo {
            statuses: Mutex<VecDeque<StatusCode>>,
            crumb_requests: AtomicUsize,
            symbols: Mutex<Vec<String>>,
            queries: Mutex<Vec<Vec<(String, String)>>>,
        }

        async fn cookie() -> Response {
            (
                StatusCode::NOT_FOUND,
                [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; Secure"))],
            )
                .into_response()
        }

        async fn crumb(State(fake): State<Arc<FakeYahoo>>, headers: HeaderMap) -> Response {
            let has_session = headers
                .get(header::COOKIE)
                .is_some_and(|value| value.as_bytes() == SESSION_COOKIE.as_bytes());
            if !has_session {
                return StatusCode::FORBIDDEN.into_response();
            }

            let n = fake.crumb_requests.fetch_add(1, Ordering::SeqCst) + 1;
            format!("crumb-{n}").into_response()
        }

        async fn quote_summary(
            State(fake): State<Arc<FakeYahoo>>,
            Path(symbol): Path<String>,
            RawQuery(query): RawQuery,
        ) -> Response {
            let pairs = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
                .into_owned()
                .collect();
            fake.queries.lock().unwrap().push(pairs);
            fake.symbols.lock().unwrap().push(symbol);

            let status = fake.statuses.lock().unwrap().pop_front().unwrap_or(StatusCode::OK);
            if status != StatusCode::OK {
                return status.into_response();
            }

            axum::Json(json!({
                "quoteSummary": {
                    "result": [{
                        "price": {
                            "regularMarketPrice": {"raw": 101.5},
                            "regularMarketChange": {"raw": 1.5},
                            "regularMarketChangePercent": {"raw": 0.015}
                        }
                    }],
                    "error": null
                }
            }))
            .into_response()
        }

        async fn start(statuses: &[StatusCode]) -> (Arc<FakeYahoo>, YahooFinanceClient) {
            let fake = Arc::new(FakeYahoo::default());
            fake.statuses.lock().unwrap().extend(statuses.iter().copied());

            let app = Router::new()
                .route("/cookie", get(cookie))
                .route("/v1/test/getcrumb", get(crumb))
                .route("/v10/finance/quoteSummary/{symbol}", get(quote_summary))
                .with_state(fake.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            let base = format!("http://{addr}");
            let client = YahooFinanceClient::with_endpoints(
                &base,
                &format!("{base}/cookie"),
                Duration::from_secs(5),
            )
            .unwrap();

            (fake, client)
        }

        fn query_value(pairs: &[(String, String)], key: &str) -> Vec<String> {
            pairs
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .collect()
        }

        #[tokio::test]
        async fn test_fetch_quote_reuses_crumb() {
            let (fake, client) = start(&[]).await;

            let record = assert_ok!(client.fetch_quote("NVDA").await);
            assert_eq!(record.price, Some(101.5));
            assert_eq!(record.change, Some(1.5));
            assert_ok!(client.fetch_quote("AAPL").await);

            assert_eq!(fake.crumb_requests.load(Ordering::SeqCst), 1);
            let queries = fake.queries.lock().unwrap();
            assert_eq!(query_value(&queries[1], "crumb"), vec!["crumb-1".to_string()]);
            assert_eq!(
                query_value(&queries[1], "modules"),
                vec![QUOTE_SUMMARY_MODULES.to_string()]
            );
        }

        #[tokio::test]
        async fn test_unauthorized_clears_crumb() {
            let (fake, client) = start(&[StatusCode::UNAUTHORIZED]).await;

            let err = client.fetch_quote("NVDA").await.unwrap_err();
            assert!(
                matches!(err, StockError::YahooFinanceError(ref msg) if msg.contains("expired"))
            );

            assert_ok!(client.fetch_quote("NVDA").await);
            assert_eq!(fake.crumb_requests.load(Ordering::SeqCst), 2);
            let queries = fake.queries.lock().unwrap();
            assert_eq!(query_value(&queries[1], "crumb"), vec!["crumb-2".to_string()]);
        }

        #[tokio::test]
        async fn test_not_found_is_symbol_not_found() {
            let (_fake, client) = start(&[StatusCode::NOT_FOUND]).await;

            let err = client.fetch_quote("NOPE").await.unwrap_err();
            assert!(matches!(err, StockError::SymbolNotFound(ref symbol) if symbol == "NOPE"));
        }

        #[tokio::test]
        async fn test_too_many_requests_is_rate_limited() {
            let (fake, client) = start(&[StatusCode::TOO_MANY_REQUESTS]).await;

            let err = client.fetch_quote("NVDA").await.unwrap_err();
            let rate_limited = matches!(
                err,
                StockError::YahooFinanceError(ref msg) if msg.contains("Rate limited")
            );
            assert!(rate_limited);
            // the crumb survives a rate limit
            assert_ok!(client.fetch_quote("NVDA").await);
            assert_eq!(fake.crumb_requests.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_server_error_is_reported() {
            let (_fake, client) = start(&[StatusCode::INTERNAL_SERVER_ERROR]).await;

            let err = client.fetch_quote("NVDA").await.unwrap_err();
            assert!(
                matches!(err, StockError::YahooFinanceError(ref msg) if msg.contains("500"))
            );
        }

        #[tokio::test]
        async fn test_symbol_is_escaped_in_path() {
            let (fake, client) = start(&[]).await;
            let symbol = "AAPL?MODULES=ASSETPROFILE#";

            assert_ok!(client.fetch_quote(symbol).await);

            assert_eq!(fake.symbols.lock().unwrap().as_slice(), [symbol.to_string()]);
            let queries = fake.queries.lock().unwrap();
            assert_eq!(
                query_value(&queries[0], "modules"),
                vec![QUOTE_SUMMARY_MODULES.to_string()]
            );
            assert!(query_value(&queries[0], "MODULES").is_empty());
        }

        #[test]
        fn test_endpoint_encodes_segments() {
            let client = YahooFinanceClient::with_endpoints(
                "https://query1.example.com/",
                "https://fc.example.com",
                Duration::from_secs(1),
            )
            .unwrap();

            let url = client.endpoint(&["v10", "finance", "quoteSummary", "A/B?C#D"]);
            assert_eq!(
                url.as_str(),
                "https://query1.example.com/v10/finance/quoteSummary/A%2FB%3FC%23D"
            );
        }

        #[test]
        fn test_invalid_base_url_is_config_error() {
            let result = YahooFinanceClient::with_endpoints(
                "not a url",
                "https://fc.example.com",
                Duration::from_secs(1),
            );
            assert!(matches!(result, Err(StockError::ConfigError(_))));
        }
    }
}
