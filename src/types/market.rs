use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Bar, BarInterval, ChartOverlays, IndicatorSignals};

/// Price history plus company metadata for a ticker, as supplied by a market
/// data source.
#[derive(Debug, Clone, PartialEq)]
pub struct StockData {
    pub ticker: String,
    pub company_name: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub bars: Vec<Bar>,
}

impl StockData {
    /// Absolute change from the previous close, rounded to cents.
    pub fn price_change(&self) -> f64 {
        round_to(self.current_price - self.previous_close, 2)
    }

    /// Percentage change from the previous close. Zero when there is no previous close.
    pub fn price_change_pct(&self) -> f64 {
        if self.previous_close == 0.0 {
            return 0.0;
        }
        round_to(self.price_change() / self.previous_close * 100.0, 2)
    }
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A single OHLCV candlestick as returned to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl OhlcvBar {
    pub fn from_bar(bar: &Bar, interval: BarInterval) -> Self {
        Self {
            date: interval.format_time(bar.time),
            open: round_to(bar.open, 2),
            high: round_to(bar.high, 2),
            low: round_to(bar.low, 2),
            close: round_to(bar.close, 2),
            volume: bar.volume.max(0.0) as u64,
        }
    }
}

/// Headline sentiment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Panic,
    Bearish,
    Neutral,
    Bullish,
    Hype,
}

impl SentimentLabel {
    /// Bucket an averaged compound score (-1 to +1).
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < -0.5 => SentimentLabel::Panic,
            s if s < -0.1 => SentimentLabel::Bearish,
            s if s > 0.5 => SentimentLabel::Hype,
            s if s > 0.1 => SentimentLabel::Bullish,
            _ => SentimentLabel::Neutral,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentLabel::Panic => "Panic",
            SentimentLabel::Bearish => "Bearish",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Bullish => "Bullish",
            SentimentLabel::Hype => "Hype",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// News sentiment for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Average compound score, -1 (very negative) to +1 (very positive).
    pub score: f64,
    pub label: SentimentLabel,
    pub headline_count: usize,
    pub top_headlines: Vec<String>,
}

impl SentimentResult {
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            headline_count: 0,
            top_headlines: Vec::new(),
        }
    }
}

/// Full analysis response for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub ticker: String,
    pub company_name: String,
    pub current_price: f64,
    pub price_change: f64,
    pub price_change_pct: f64,
    pub ohlcv: Vec<OhlcvBar>,
    pub indicators: IndicatorSignals,
    pub overlays: Option<ChartOverlays>,
    pub sentiment: Option<SentimentResult>,
    pub analyzed_at: String,
}

/// Current price snapshot for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub ticker: String,
    pub company_name: String,
    pub current_price: f64,
    pub previous_close: f64,
}

impl PriceQuote {
    pub fn from_stock_data(data: &StockData) -> Self {
        Self {
            ticker: data.ticker.clone(),
            company_name: data.company_name.clone(),
            current_price: round_to(data.current_price, 2),
            previous_close: round_to(data.previous_close, 2),
        }
    }

    pub fn change(&self) -> f64 {
        round_to(self.current_price - self.previous_close, 2)
    }

    pub fn change_pct(&self) -> f64 {
        if self.previous_close == 0.0 {
            return 0.0;
        }
        round_to(self.change() / self.previous_close * 100.0, 2)
    }
}

/// Watchlist row. Price fields are null when the quote could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub ticker: String,
    pub name: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
}

impl WatchlistEntry {
    pub fn unavailable(ticker: &str, name: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: name.to_string(),
            price: None,
            change: None,
            change_pct: None,
        }
    }

    pub fn from_quote(ticker: &str, name: &str, quote: &PriceQuote) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: name.to_string(),
            price: Some(quote.current_price),
            change: Some(quote.change()),
            change_pct: Some(quote.change_pct()),
        }
    }
}
