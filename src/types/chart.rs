use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// OHLCV (Open, High, Low, Close, Volume) bar.
///
/// `time` is the bar's opening time in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Bar time as a UTC datetime, `None` if the timestamp is out of range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

/// Bar interval family, decides how dates are labelled and how the
/// forecaster steps into the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BarInterval {
    Intraday,
    #[default]
    Daily,
}

impl BarInterval {
    /// Intervals Yahoo Finance reports below one day.
    pub const INTRADAY: [&'static str; 8] = ["1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h"];

    /// Classify a Yahoo-style interval string ("1m", "1h", "1d", "1wk", ...).
    pub fn from_interval(interval: &str) -> Self {
        if Self::INTRADAY.contains(&interval) {
            BarInterval::Intraday
        } else {
            BarInterval::Daily
        }
    }

    pub fn from_intraday_flag(is_intraday: bool) -> Self {
        if is_intraday {
            BarInterval::Intraday
        } else {
            BarInterval::Daily
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(self, BarInterval::Intraday)
    }

    /// Chart label for a unix-seconds timestamp.
    ///
    /// Daily data is labelled `YYYY-MM-DD`; intraday data keeps the unix
    /// timestamp because the charting client needs sub-day resolution.
    pub fn format_time(&self, time: i64) -> String {
        match self {
            BarInterval::Intraday => time.to_string(),
            BarInterval::Daily => DateTime::from_timestamp(time, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| time.to_string()),
        }
    }
}

/// A single point of an overlay line on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    pub date: String,
    pub value: Option<f64>,
}

/// A MACD point. Signal and histogram stay null until the signal EMA has
/// enough MACD values behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub date: String,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

/// A forecast price point, always dated after the last bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: String,
    pub value: f64,
}

/// Indicator series and forecast prepared for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartOverlays {
    pub sma_50: Vec<OverlayPoint>,
    pub sma_200: Vec<OverlayPoint>,
    pub sar: Vec<OverlayPoint>,
    pub macd: Vec<MacdPoint>,
    pub prediction: Vec<PredictionPoint>,
    pub prediction_direction: Direction,
    pub prediction_target: Option<f64>,
}
