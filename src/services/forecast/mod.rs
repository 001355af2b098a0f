//! Short-horizon price forecasting.
//!
//! Two tiers are tried in order: an ARIMA model fitted on the trailing window
//! of closes, then an ordinary least squares line through the same window.
//! The first tier that produces a finite path wins. When neither does, the
//! forecast is empty with a neutral direction.

mod arima;
mod calendar;
mod linear;

pub use arima::Arima;
pub use calendar::future_times;
pub use linear::LinearTrend;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{round_to, Bar, BarInterval, Direction, PredictionPoint};

/// ARIMA (p, d, q) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive lags.
    pub p: usize,
    /// Differencing passes.
    pub d: usize,
    /// Moving-average lags.
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Parse `"p,d,q"` (whitespace around the numbers is ignored).
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<usize> = s
            .split(',')
            .map(|part| part.trim().parse().ok())
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [p, d, q] => Some(Self::new(*p, *d, *q)),
            _ => None,
        }
    }

    /// Smallest series the model will fit.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 10
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(5, 1, 0)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Largest number of future points a forecast will produce.
pub const MAX_HORIZON: usize = 365;

/// Forecaster tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Number of trailing closes the models see.
    pub window: usize,
    /// Number of future points to produce.
    pub horizon: usize,
    pub order: ArimaOrder,
    /// Below this many closes no forecast is attempted.
    pub min_points: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: 60,
            horizon: 5,
            order: ArimaOrder::default(),
            min_points: 10,
        }
    }
}

/// Why a forecasting tier could not produce a path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Insufficient data: need {required} points, have {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Series contains NaN or infinite values")]
    NonFiniteInput,

    #[error("Autoregression is not stationary (reflection {reflection} at lag {lag})")]
    NonStationary { lag: usize, reflection: f64 },

    #[error("Model produced a non-finite forecast")]
    NonFiniteOutput,
}

/// Raw forecast path plus the level its direction is judged against.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub values: Vec<f64>,
    pub reference: f64,
}

/// One forecasting tier.
pub trait Forecaster: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> String;

    /// Relative move beyond `reference` that counts as directional.
    fn threshold(&self) -> f64;

    /// Project `horizon` values past the end of `series`.
    fn project(&self, series: &[f64], horizon: usize) -> Result<Projection, ForecastError>;
}

/// Future-dated price path with its direction and final target.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    pub points: Vec<PredictionPoint>,
    pub direction: Direction,
    pub target: Option<f64>,
}

impl Forecast {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Classify the last projected value against `reference` with a symmetric
/// relative band.
pub fn classify(last: f64, reference: f64, threshold: f64) -> Direction {
    if last > reference * (1.0 + threshold) {
        Direction::Bullish
    } else if last < reference * (1.0 - threshold) {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}

/// Forecast the closes of `bars` using the configured tiers.
pub fn forecast(bars: &[Bar], interval: BarInterval, config: &ForecastConfig) -> Forecast {
    let tiers: [&dyn Forecaster; 2] = [&Arima::new(config.order), &LinearTrend];
    forecast_with(bars, interval, config, &tiers)
}

/// Forecast with an explicit tier list, first success wins.
pub fn forecast_with(
    bars: &[Bar],
    interval: BarInterval,
    config: &ForecastConfig,
    tiers: &[&dyn Forecaster],
) -> Forecast {
    let start = bars.len().saturating_sub(config.window);
    let closes: Vec<f64> = bars[start..].iter().map(|b| b.close).collect();

    let horizon = config.horizon.min(MAX_HORIZON);
    if closes.len() < config.min_points || horizon == 0 {
        return Forecast::empty();
    }
    let Some(last_bar) = bars.last() else {
        return Forecast::empty();
    };

    let times = future_times(last_bar.time, interval, horizon);
    if times.len() < horizon {
        warn!(
            "No room for {} future dates after {}, skipping forecast",
            horizon, last_bar.time
        );
        return Forecast::empty();
    }

    for tier in tiers {
        match tier.project(&closes, horizon) {
            Ok(projection) => {
                let Some(&last) = projection.values.last() else {
                    continue;
                };
                let direction = classify(last, projection.reference, tier.threshold());
                let points = times
                    .iter()
                    .zip(&projection.values)
                    .map(|(&time, value)| PredictionPoint {
                        date: interval.format_time(time),
                        value: round_to(*value, 2),
                    })
                    .collect();

                debug!(
                    "{} forecast over {} closes: {} -> {:.2}",
                    tier.name(),
                    closes.len(),
                    direction,
                    last
                );

                return Forecast {
                    points,
                    direction,
                    target: Some(round_to(last, 2)),
                };
            }
            Err(e) => warn!("{} forecast failed: {}", tier.name(), e),
        }
    }

    Forecast::empty()
}
