//! Exchange REST client.

use super::DataConverter;
use super::wire::{ExchangeInfo, TickerPrice};
use crate::config::ExchangeConfig;
use crate::error::FetchError;
use crate::state::{Catalog, PriceQuote, Symbol};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Market data needed by the tracker.
///
/// Implementations must be cheap to share between tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch the tradable symbols quoted in the configured currency.
    async fn fetch_catalog(&self) -> Result<Catalog, FetchError>;

    /// Fetch current prices for `symbols` in a single request.
    async fn fetch_prices(&self, symbols: &[Symbol]) -> Result<Vec<PriceQuote>, FetchError>;
}

/// REST client for the exchange's public market-data endpoints.
pub struct ExchangeClient {
    /// Configuration.
    config: ExchangeConfig,
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Rate limiter state.
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl ExchangeClient {
    /// Create a new client.
    pub fn new(config: ExchangeConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pairwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let rate_limiter = Arc::new(Mutex::new(RateLimiter::new(config.rate_limit)));

        Ok(Self {
            config,
            http,
            rate_limiter,
        })
    }

    /// Full URL of an API path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Encode symbols the way the ticker endpoint expects: a JSON array.
    pub fn symbols_param(symbols: &[Symbol]) -> Result<String, FetchError> {
        Ok(serde_json::to_string(symbols)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        self.rate_limit().await;

        let url = self.endpoint(path);
        debug!(url = %url, "GET");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Apply rate limiting.
    async fn rate_limit(&self) {
        let mut limiter = self.rate_limiter.lock().await;
        limiter.wait().await;
    }
}

#[async_trait]
impl MarketData for ExchangeClient {
    async fn fetch_catalog(&self) -> Result<Catalog, FetchError> {
        let info: ExchangeInfo = self.get_json("/api/v3/exchangeInfo", &[]).await?;
        let catalog = DataConverter::convert_catalog(
            info,
            &self.config.quote_asset,
            &self.config.trading_status,
        );
        debug!(symbols = catalog.len(), "catalog converted");
        Ok(catalog)
    }

    async fn fetch_prices(&self, symbols: &[Symbol]) -> Result<Vec<PriceQuote>, FetchError> {
        let param = Self::symbols_param(symbols)?;
        let tickers: Vec<TickerPrice> = self
            .get_json("/api/v3/ticker/price", &[("symbols", param)])
            .await?;
        DataConverter::convert_prices(tickers)
    }
}

/// Token-bucket rate limiter.
struct RateLimiter {
    requests_per_second: f64,
    last_request: Instant,
    tokens: f64,
}

impl RateLimiter {
    fn new(requests_per_second: u32) -> Self {
        let requests_per_second = f64::from(requests_per_second.max(1));
        Self {
            requests_per_second,
            last_request: Instant::now(),
            tokens: requests_per_second,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed().as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.requests_per_second).min(self.requests_per_second);

        if self.tokens < 1.0 {
            let wait_time = (1.0 - self.tokens) / self.requests_per_second;
            tokio::time::sleep(Duration::from_secs_f64(wait_time)).await;
            self.tokens = 1.0;
        }

        self.tokens -= 1.0;
        self.last_request = Instant::now();
    }
}
