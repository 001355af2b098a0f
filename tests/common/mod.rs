//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use vantage::config::Config;
use vantage::error::{AppError, Result};
use vantage::services::{MarketDataProvider, MarketDataService, SentimentAnalyzer};
use vantage::types::{Bar, StockData};
use vantage::AppState;

/// Monday 2024-01-01 00:00 UTC.
pub const START: i64 = 1_704_067_200;

/// Daily bars from `START` with a one-point high/low spread.
pub fn daily_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            time: START + i as i64 * 86_400,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000.0,
        })
        .collect()
}

/// 120 days rising one point a day from 100.
pub fn rally_closes() -> Vec<f64> {
    (0..120).map(|i| 100.0 + i as f64).collect()
}

/// Market data served from memory.
///
/// `AAPL`, `NONEWS` and `BTC-USD` return a steady rally; `BAD` returns bars
/// with a repeated timestamp; anything else is not found. Only `AAPL` has
/// headlines.
pub struct StaticMarketData;

impl StaticMarketData {
    fn lookup(ticker: &str) -> Result<StockData> {
        let ticker = ticker.trim().to_uppercase();
        let bars = match ticker.as_str() {
            "AAPL" | "NONEWS" | "BTC-USD" => daily_bars(&rally_closes()),
            "BAD" => {
                let mut bars = daily_bars(&[100.0, 101.0, 102.0]);
                bars[2].time = bars[1].time;
                bars
            }
            _ => {
                return Err(AppError::NotFound(format!(
                    "No data found for ticker '{}'. Verify the symbol is correct.",
                    ticker
                )))
            }
        };

        let current_price = bars[bars.len() - 1].close;
        let previous_close = bars[bars.len() - 2].close;
        Ok(StockData {
            company_name: format!("{} Corp", ticker),
            ticker,
            current_price,
            previous_close,
            bars,
        })
    }
}

impl MarketDataProvider for StaticMarketData {
    fn stock_data<'a>(
        &'a self,
        ticker: &'a str,
        _period: &'a str,
        _interval: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<StockData>> + Send + 'a>> {
        Box::pin(async move { Self::lookup(ticker) })
    }

    fn headlines<'a>(
        &'a self,
        ticker: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>> {
        Box::pin(async move {
            if !ticker.eq_ignore_ascii_case("AAPL") {
                return Err(AppError::ExternalApi(
                    "Yahoo search API error: 503 Service Unavailable".to_string(),
                ));
            }
            Ok([
                "Apple shares soar after strong earnings beat",
                "Analysts upgrade Apple on record iPhone growth",
                "Apple schedules developer conference",
            ]
            .iter()
            .take(limit)
            .map(|s| s.to_string())
            .collect())
        })
    }
}

/// Application state over the in-memory provider with default config.
pub fn test_state() -> AppState {
    AppState {
        config: Arc::new(Config::default()),
        market_data: Arc::new(MarketDataService::new(
            Arc::new(StaticMarketData),
            Duration::from_secs(30),
        )),
        sentiment: Arc::new(SentimentAnalyzer::new()),
    }
}
