//! Moving-average trend classifier.

use crate::services::signals::series::mean;
use crate::services::signals::Indicator;
use crate::types::{Bar, Direction, IndicatorSignal};

/// Trend from price against a fast and a slow simple moving average.
///
/// The fast average decides Bullish/Bearish. Once the slow average is
/// available the detail also reports a Golden Cross or Death Cross; that
/// annotation never changes the reading.
pub struct SmaTrend {
    fast_period: usize,
    slow_period: usize,
}

impl Default for SmaTrend {
    fn default() -> Self {
        Self {
            fast_period: 50,
            slow_period: 200,
        }
    }
}

impl SmaTrend {
    fn trailing_mean(closes: &[f64], period: usize) -> Option<f64> {
        (closes.len() >= period && period > 0).then(|| mean(&closes[closes.len() - period..]))
    }
}

impl Indicator for SmaTrend {
    type Reading = Direction;

    fn name(&self) -> &str {
        "SMA-50"
    }

    fn min_periods(&self) -> usize {
        self.fast_period
    }

    fn evaluate(&self, bars: &[Bar]) -> IndicatorSignal<Direction> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let (Some(fast), Some(price)) = (
            Self::trailing_mean(&closes, self.fast_period),
            closes.last().copied(),
        ) else {
            return IndicatorSignal::insufficient(
                Direction::Neutral,
                self.name(),
                closes.len(),
                self.min_periods(),
            );
        };

        let (direction, side) = if price > fast {
            (Direction::Bullish, "above")
        } else {
            (Direction::Bearish, "below")
        };
        let mut detail = format!(
            "Price {} {}-day SMA ({:.2} vs {:.2})",
            side, self.fast_period, price, fast
        );

        if let Some(slow) = Self::trailing_mean(&closes, self.slow_period) {
            if fast > slow {
                detail.push_str(&format!(
                    "; Golden Cross (SMA-{} above SMA-{})",
                    self.fast_period, self.slow_period
                ));
            } else if fast < slow {
                detail.push_str(&format!(
                    "; Death Cross (SMA-{} below SMA-{})",
                    self.fast_period, self.slow_period
                ));
            }
        }

        IndicatorSignal::new(direction, detail)
    }
}
