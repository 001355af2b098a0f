//! Yahoo Finance API client for price history and news.
//!
//! Uses the unofficial chart and search endpoints (no API key required).

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::Bar;

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    symbol: String,
    short_name: Option<String>,
    long_name: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Yahoo Finance search response (news only).
#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    news: Vec<YahooNewsItem>,
}

#[derive(Debug, Deserialize)]
struct YahooNewsItem {
    #[serde(default)]
    title: String,
}

/// Price history and quote metadata for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct YahooChartData {
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub bars: Vec<Bar>,
}

/// Normalize symbol for Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
pub fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

fn no_data(symbol: &str) -> AppError {
    AppError::NotFound(format!(
        "No data found for ticker '{}'. Verify the symbol is correct.",
        symbol
    ))
}

/// Order bars by time, keeping the last bar seen for each timestamp.
fn normalize_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|bar| bar.time);
    let mut normalized: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match normalized.last_mut() {
            Some(previous) if previous.time == bar.time => *previous = bar,
            _ => normalized.push(bar),
        }
    }
    normalized
}

/// Turn a decoded chart response into time-ordered bars, skipping points
/// without a close.
fn parse_chart(symbol: &str, data: YahooChartResponse) -> Result<YahooChartData> {
    if let Some(error) = data.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(no_data(symbol));
        }
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| no_data(symbol))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next();
    let (opens, highs, lows, closes, volumes) = match quote {
        Some(q) => (
            q.open.unwrap_or_default(),
            q.high.unwrap_or_default(),
            q.low.unwrap_or_default(),
            q.close.unwrap_or_default(),
            q.volume.unwrap_or_default(),
        ),
        None => Default::default(),
    };

    let bars: Vec<Bar> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &time)| {
            let close = closes.get(i).copied().flatten().filter(|c| *c > 0.0)?;
            Some(Bar {
                time,
                open: opens.get(i).copied().flatten().unwrap_or(close),
                high: highs.get(i).copied().flatten().unwrap_or(close),
                low: lows.get(i).copied().flatten().unwrap_or(close),
                close,
                volume: volumes.get(i).copied().flatten().unwrap_or(0) as f64,
            })
        })
        .collect();
    let bars = normalize_bars(bars);

    if bars.is_empty() {
        return Err(no_data(symbol));
    }

    Ok(YahooChartData {
        symbol: result.meta.symbol,
        short_name: result.meta.short_name,
        long_name: result.meta.long_name,
        regular_market_price: result.meta.regular_market_price,
        previous_close: result.meta.previous_close,
        bars,
    })
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self { client })
    }

    /// Fetch price history for a symbol.
    ///
    /// Arguments:
    /// - symbol: Stock/crypto symbol (e.g., "AAPL", "BTC-USD")
    /// - range: Time range ("1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max")
    /// - interval: Data interval ("1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo")
    pub async fn get_chart(&self, symbol: &str, range: &str, interval: &str) -> Result<YahooChartData> {
        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            BASE_URL, yahoo_symbol, range, interval
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(no_data(&yahoo_symbol));
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo chart API error: {}",
                response.status()
            )));
        }

        let data: YahooChartResponse = response.json().await?;
        parse_chart(&yahoo_symbol, data)
    }

    /// Fetch recent news headlines for a symbol.
    pub async fn get_headlines(&self, symbol: &str, limit: usize) -> Result<Vec<String>> {
        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        let url = format!(
            "{}/v1/finance/search?q={}&newsCount={}&quotesCount=0",
            BASE_URL, yahoo_symbol, limit
        );

        debug!("Fetching Yahoo Finance news: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo search API error: {}",
                response.status()
            )));
        }

        let data: YahooSearchResponse = response.json().await?;
        Ok(data
            .news
            .into_iter()
            .map(|item| item.title)
            .filter(|title| !title.trim().is_empty())
            .take(limit)
            .collect())
    }
}
