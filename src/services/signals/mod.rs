//! Indicator and prediction engine.
//!
//! Turns one ascending bar sequence into four indicator readings, a
//! composite recommendation and chart overlays. Every call is a pure
//! function of its input. Short histories degrade to neutral readings and
//! only malformed sequences are rejected.

pub mod composite;
pub mod indicators;
pub mod overlays;
pub mod series;

pub use composite::{composite_signal, Tally};
pub use overlays::build_overlays;

use crate::error::AnalysisError;
use crate::services::forecast::ForecastConfig;
use crate::types::{Bar, BarInterval, ChartOverlays, Direction, IndicatorSignal, IndicatorSignals};
use indicators::{Macd, ObvDivergence, ParabolicSar, SmaTrend};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Categorical reading this indicator produces.
    type Reading;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of bars required for a real reading.
    fn min_periods(&self) -> usize;

    /// Evaluate the latest bar. Short histories produce the indicator's
    /// neutral reading with an insufficient-data detail.
    fn evaluate(&self, bars: &[Bar]) -> IndicatorSignal<Self::Reading>;
}

/// Signal bundle and overlays for one bar sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub indicators: IndicatorSignals,
    pub overlays: ChartOverlays,
}

/// Reject sequences no reading can be derived from.
pub fn validate_bars(bars: &[Bar]) -> Result<(), AnalysisError> {
    if bars.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    for (index, bar) in bars.iter().enumerate() {
        let values = [bar.open, bar.high, bar.low, bar.close, bar.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::NonFinitePrice { index });
        }
        if bar.datetime().is_none() {
            return Err(AnalysisError::InvalidTimestamp {
                index,
                time: bar.time,
            });
        }
        if index > 0 && bar.time <= bars[index - 1].time {
            return Err(AnalysisError::NonMonotonic {
                index,
                time: bar.time,
                previous: bars[index - 1].time,
            });
        }
    }

    Ok(())
}

/// Indicator readings and the composite recommendation for the latest bar.
///
/// `prediction_direction` is the forecast's vote; pass `Neutral` when no
/// forecast is available.
pub fn calculate_indicators(
    bars: &[Bar],
    prediction_direction: Direction,
) -> Result<IndicatorSignals, AnalysisError> {
    validate_bars(bars)?;

    let trend = SmaTrend::default().evaluate(bars);
    let sar = ParabolicSar::default().evaluate(bars);
    let macd = Macd::default().evaluate(bars);
    let obv = ObvDivergence::default().evaluate(bars);

    let composite = composite_signal(trend.kind, sar.kind, macd.kind, obv.kind, prediction_direction);

    Ok(IndicatorSignals::new(trend, sar, macd, obv, composite))
}

/// Overlays with the default forecaster settings.
pub fn calculate_overlays(bars: &[Bar], is_intraday: bool) -> Result<ChartOverlays, AnalysisError> {
    calculate_overlays_with(bars, is_intraday, &ForecastConfig::default())
}

pub fn calculate_overlays_with(
    bars: &[Bar],
    is_intraday: bool,
    config: &ForecastConfig,
) -> Result<ChartOverlays, AnalysisError> {
    validate_bars(bars)?;
    Ok(build_overlays(
        bars,
        BarInterval::from_intraday_flag(is_intraday),
        config,
    ))
}

/// Full analysis. Overlays run first so the forecast direction can vote in
/// the composite recommendation.
pub fn analyze(
    bars: &[Bar],
    is_intraday: bool,
    config: &ForecastConfig,
) -> Result<Analysis, AnalysisError> {
    let overlays = calculate_overlays_with(bars, is_intraday, config)?;
    let indicators = calculate_indicators(bars, overlays.prediction_direction)?;
    Ok(Analysis {
        indicators,
        overlays,
    })
}

/// Daily bars starting Monday 2024-01-01 with a one-point high/low spread.
#[cfg(test)]
pub(crate) fn test_bars(closes: &[f64]) -> Vec<Bar> {
    const START: i64 = 1_704_067_200;
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
