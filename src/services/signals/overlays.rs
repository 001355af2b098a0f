//! Chart overlay series built across the whole bar history.

use crate::services::forecast::{forecast, ForecastConfig};
use crate::services::signals::indicators::{Macd, ParabolicSar};
use crate::services::signals::series::sma;
use crate::types::{round_to, Bar, BarInterval, ChartOverlays, MacdPoint, OverlayPoint};

const SMA_FAST: usize = 50;
const SMA_SLOW: usize = 200;

/// SMA points from the first full window onward.
fn sma_points(bars: &[Bar], closes: &[f64], period: usize, interval: BarInterval) -> Vec<OverlayPoint> {
    bars.iter()
        .zip(sma(closes, period))
        .filter_map(|(bar, value)| {
            value.map(|v| OverlayPoint {
                date: interval.format_time(bar.time),
                value: Some(round_to(v, 2)),
            })
        })
        .collect()
}

/// Build the SMA, SAR and MACD series and run the forecaster once.
///
/// The forecast direction on the returned overlays is what the composite
/// recommendation votes with.
pub fn build_overlays(bars: &[Bar], interval: BarInterval, config: &ForecastConfig) -> ChartOverlays {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let sar = bars
        .iter()
        .zip(ParabolicSar::default().series(bars))
        .map(|(bar, value)| OverlayPoint {
            date: interval.format_time(bar.time),
            value: Some(round_to(value, 2)),
        })
        .collect();

    let macd = Macd::default();
    let lines = macd.series(&closes);
    let macd_points = bars
        .iter()
        .enumerate()
        .skip(macd.warmup())
        .map(|(i, bar)| MacdPoint {
            date: interval.format_time(bar.time),
            macd: lines.macd[i].map(|v| round_to(v, 4)),
            signal: lines.signal[i].map(|v| round_to(v, 4)),
            histogram: lines.histogram[i].map(|v| round_to(v, 4)),
        })
        .collect();

    let forecast = forecast(bars, interval, config);

    ChartOverlays {
        sma_50: sma_points(bars, &closes, SMA_FAST, interval),
        sma_200: sma_points(bars, &closes, SMA_SLOW, interval),
        sar,
        macd: macd_points,
        prediction: forecast.points,
        prediction_direction: forecast.direction,
        prediction_target: forecast.target,
    }
}
