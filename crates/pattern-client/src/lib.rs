use std::time::Duration;

use chrono::NaiveDate;
use replay_core::{filter_trading_days, CandleSeries, PatternKind, RawRecord, ReplayError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub mod synthetic;


const DEFAULT_BASE_URL: &str = "https://tradenerves.com";

/// A pattern pick from the catalogue: which symbol to replay and the
/// as-of timestamp anchoring the price window.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternPick {
    pub symbol: String,
    #[serde(alias = "timestamp")]
    pub as_of: String,
}

/// Async client for the pattern data service.
///
/// Fetch failures never touch downstream state: the caller's series
/// store keeps its last-good series and the error is surfaced to the
/// UI layer only.
#[derive(Clone)]
pub struct PatternClient {
    base_url: String,
    client: Client,
}

impl PatternClient {
    /// Build a client against `PATTERN_API_URL`, falling back to the
    /// production service.
    pub fn new() -> Self {
        let base_url =
            std::env::var("PATTERN_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Pick a stock exhibiting the requested pattern.
    pub async fn fetch_pattern(&self, kind: PatternKind) -> Result<PatternPick, ReplayError> {
        let url = format!("{}{}", self.base_url, Self::pattern_endpoint(kind));
        self.get_json(&url).await
    }

    /// Candles for a symbol anchored at `as_of`; `intraday` selects
    /// five-minute bars instead of dailies. Rows are compacted through
    /// the trading-day filter before they become a series.
    pub async fn fetch_price_series(
        &self,
        symbol: &str,
        as_of: &str,
        intraday: bool,
    ) -> Result<CandleSeries, ReplayError> {
        let route = if intraday {
            "stock_prices_intra"
        } else {
            "stock_prices"
        };
        let url = format!("{}/api/{}/{}/{}", self.base_url, route, symbol, as_of);
        let rows: Vec<RawRecord> = self.get_json(&url).await?;
        Self::compact(symbol, rows)
    }

    /// Daily candles for an explicit date range.
    pub async fn fetch_historical(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CandleSeries, ReplayError> {
        if start > end {
            return Err(ReplayError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        let url = format!(
            "{}/api/historical/{}/{}/{}",
            self.base_url,
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
        let rows: Vec<RawRecord> = self.get_json(&url).await?;
        Self::compact(symbol, rows)
    }

    pub(crate) fn pattern_endpoint(kind: PatternKind) -> &'static str {
        match kind {
            PatternKind::DoubleBottom => "/api/stocks/double_bottoms",
            PatternKind::HighVolatility => "/api/stocks/high_volatility",
            PatternKind::Hammer => "/api/stocks/hammer",
            PatternKind::Green => "/api/stocks/green",
            PatternKind::GreenFive => "/api/stocks/green_five",
            PatternKind::Random => "/api/random_stock",
        }
    }

    fn compact(symbol: &str, rows: Vec<RawRecord>) -> Result<CandleSeries, ReplayError> {
        if rows.is_empty() {
            return Err(ReplayError::NoData(format!("no rows for {symbol}")));
        }
        let series = filter_trading_days(&rows);
        if series.is_empty() {
            return Err(ReplayError::NoData(format!(
                "no usable trading days for {symbol}"
            )));
        }
        tracing::debug!(
            symbol,
            raw = rows.len(),
            usable = series.len(),
            "price series fetched"
        );
        Ok(series)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ReplayError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReplayError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ReplayError::Api(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ReplayError::Api(e.to_string()))
    }
}

impl Default for PatternClient {
    fn default() -> Self {
        Self::new()
    }
}
