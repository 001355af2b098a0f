//! MACD (Moving Average Convergence Divergence) indicator.

use crate::services::signals::series::{ema, ema_defined, last_two};
use crate::services::signals::Indicator;
use crate::types::{Bar, Direction, IndicatorSignal};

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// The reading is Bullish when MACD sits above its signal line. A histogram
/// sign change on the latest bar is reported as a crossover.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// Index-aligned MACD lines.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl Macd {
    /// First index with a MACD value.
    pub fn warmup(&self) -> usize {
        self.slow_period.saturating_sub(1)
    }

    pub fn series(&self, closes: &[f64]) -> MacdSeries {
        let fast = ema(closes, self.fast_period);
        let slow = ema(closes, self.slow_period);

        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();
        let signal = ema_defined(&macd, self.signal_period);
        let histogram = macd
            .iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    type Reading = Direction;

    fn name(&self) -> &str {
        "MACD"
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period
    }

    fn evaluate(&self, bars: &[Bar]) -> IndicatorSignal<Direction> {
        if bars.len() < self.min_periods() {
            return IndicatorSignal::insufficient(
                Direction::Neutral,
                self.name(),
                bars.len(),
                self.min_periods(),
            );
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let lines = self.series(&closes);

        let (Some(macd), Some(signal), Some((prev_hist, hist))) = (
            lines.macd.last().copied().flatten(),
            lines.signal.last().copied().flatten(),
            last_two(&lines.histogram),
        ) else {
            return IndicatorSignal::insufficient(
                Direction::Neutral,
                self.name(),
                bars.len(),
                self.min_periods(),
            );
        };

        let (direction, side) = if macd > signal {
            (Direction::Bullish, "above")
        } else {
            (Direction::Bearish, "below")
        };
        let mut detail = format!(
            "MACD {} signal line ({:.4} vs {:.4})",
            side, macd, signal
        );
        if let Some(note) = crossover(prev_hist, hist) {
            detail.push_str(", ");
            detail.push_str(note);
        }

        IndicatorSignal::new(direction, detail)
    }
}

/// Histogram sign change between the previous and the latest bar.
fn crossover(previous: f64, current: f64) -> Option<&'static str> {
    if previous < 0.0 && current > 0.0 {
        Some("bullish crossover")
    } else if previous > 0.0 && current < 0.0 {
        Some("bearish crossover")
    } else {
        None
    }
}
