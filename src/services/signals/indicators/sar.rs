//! Parabolic SAR (Stop and Reverse) indicator.

use crate::services::signals::Indicator;
use crate::types::{Bar, IndicatorSignal, SarSignal};

/// Which side of price the stop is trailing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SarSide {
    /// Stop below price, extreme point tracks the highest high.
    Long,
    /// Stop above price, extreme point tracks the lowest low.
    Short,
}

/// Recurrence state carried from one bar to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarState {
    pub side: SarSide,
    pub sar: f64,
    pub extreme_point: f64,
    pub af: f64,
}

/// Parabolic SAR.
///
/// A trailing stop that accelerates toward price as the trend extends and
/// flips to the other side when price crosses it.
pub struct ParabolicSar {
    af_start: f64,
    af_increment: f64,
    af_max: f64,
}

impl Default for ParabolicSar {
    fn default() -> Self {
        Self {
            af_start: 0.02,
            af_increment: 0.02,
            af_max: 0.20,
        }
    }
}

impl SarState {
    /// State at the first bar: long, stop at the low, extreme at the high.
    pub fn initial(bar: &Bar, params: &ParabolicSar) -> Self {
        Self {
            side: SarSide::Long,
            sar: bar.low,
            extreme_point: bar.high,
            af: params.af_start,
        }
    }

    /// Advance to `bar`. `prior` holds up to two bars immediately before it.
    pub fn step(self, params: &ParabolicSar, bar: &Bar, prior: &[Bar]) -> Self {
        let projected = self.sar + self.af * (self.extreme_point - self.sar);

        match self.side {
            SarSide::Long => {
                let sar = prior.iter().fold(projected, |acc, b| acc.min(b.low));
                if bar.low < sar {
                    Self {
                        side: SarSide::Short,
                        sar: self.extreme_point,
                        extreme_point: bar.low,
                        af: params.af_start,
                    }
                } else if bar.high > self.extreme_point {
                    Self {
                        sar,
                        extreme_point: bar.high,
                        af: (self.af + params.af_increment).min(params.af_max),
                        ..self
                    }
                } else {
                    Self { sar, ..self }
                }
            }
            SarSide::Short => {
                let sar = prior.iter().fold(projected, |acc, b| acc.max(b.high));
                if bar.high > sar {
                    Self {
                        side: SarSide::Long,
                        sar: self.extreme_point,
                        extreme_point: bar.high,
                        af: params.af_start,
                    }
                } else if bar.low < self.extreme_point {
                    Self {
                        sar,
                        extreme_point: bar.low,
                        af: (self.af + params.af_increment).min(params.af_max),
                        ..self
                    }
                } else {
                    Self { sar, ..self }
                }
            }
        }
    }
}

impl ParabolicSar {
    /// Per-bar states, one per input bar.
    pub fn states(&self, bars: &[Bar]) -> Vec<SarState> {
        let Some(first) = bars.first() else {
            return Vec::new();
        };

        let initial = SarState::initial(first, self);
        std::iter::once(initial)
            .chain((1..bars.len()).scan(initial, |state, i| {
                *state = state.step(self, &bars[i], &bars[i.saturating_sub(2)..i]);
                Some(*state)
            }))
            .collect()
    }

    /// Stop level for every bar.
    pub fn series(&self, bars: &[Bar]) -> Vec<f64> {
        self.states(bars).iter().map(|s| s.sar).collect()
    }
}

impl Indicator for ParabolicSar {
    type Reading = SarSignal;

    fn name(&self) -> &str {
        "Parabolic SAR"
    }

    fn min_periods(&self) -> usize {
        5
    }

    fn evaluate(&self, bars: &[Bar]) -> IndicatorSignal<SarSignal> {
        if bars.len() < self.min_periods() {
            return IndicatorSignal::insufficient(
                SarSignal::Hold,
                self.name(),
                bars.len(),
                self.min_periods(),
            );
        }

        let (Some(sar), Some(bar)) = (self.series(bars).last().copied(), bars.last()) else {
            return IndicatorSignal::new(SarSignal::Hold, "No SAR value");
        };

        if bar.close > sar {
            IndicatorSignal::new(
                SarSignal::Buy,
                format!("Price above SAR dots (uptrend, stop at {:.2})", sar),
            )
        } else {
            IndicatorSignal::new(
                SarSignal::Sell,
                format!("Price below SAR dots (downtrend, stop at {:.2})", sar),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_bars;

    fn bar(high: f64, low: f64, close: f64) -> Bar {
        Bar {
            time: 0,
            open: close,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn test_sar_insufficient_data() {
        let signal = ParabolicSar::default().evaluate(&test_bars(&[10.0, 11.0, 12.0, 13.0]));
        assert_eq!(signal.kind, SarSignal::Hold);
        assert_eq!(
            signal.detail,
            "Insufficient data for Parabolic SAR (have 4 bars, need 5)"
        );
    }

    #[test]
    fn test_sar_series_one_value_per_bar() {
        let sar = ParabolicSar::default();
        assert!(sar.series(&[]).is_empty());
        assert_eq!(sar.series(&test_bars(&[10.0])).len(), 1);
        assert_eq!(sar.series(&test_bars(&[10.0, 11.0, 9.0])).len(), 3);
    }

    #[test]
    fn test_sar_initial_state() {
        let states = ParabolicSar::default().states(&[bar(12.0, 9.0, 11.0)]);
        assert_eq!(
            states[0],
            SarState {
                side: SarSide::Long,
                sar: 9.0,
                extreme_point: 12.0,
                af: 0.02
            }
        );
    }

    #[test]
    fn test_sar_long_step_accelerates_on_new_high() {
        let params = ParabolicSar::default();
        let first = bar(12.0, 9.0, 11.0);
        let second = bar(13.0, 10.0, 12.5);
        let state = SarState::initial(&first, &params).step(&params, &second, &[first]);

        assert_eq!(state.side, SarSide::Long);
        // 9 + 0.02 * (12 - 9) = 9.06, clamped to the prior low of 9
        assert_eq!(state.sar, 9.0);
        assert_eq!(state.extreme_point, 13.0);
        assert!((state.af - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_sar_long_reversal() {
        let params = ParabolicSar::default();
        let first = bar(12.0, 9.0, 11.0);
        let second = bar(10.0, 8.0, 8.5);
        let state = SarState::initial(&first, &params).step(&params, &second, &[first]);

        assert_eq!(state.side, SarSide::Short);
        assert_eq!(state.sar, 12.0);
        assert_eq!(state.extreme_point, 8.0);
        assert_eq!(state.af, 0.02);
    }

    #[test]
    fn test_sar_short_reversal() {
        let params = ParabolicSar::default();
        let short = SarState {
            side: SarSide::Short,
            sar: 12.0,
            extreme_point: 8.0,
            af: 0.06,
        };
        let prior = [bar(11.0, 8.0, 9.0), bar(10.0, 8.5, 9.5)];
        let state = short.step(&params, &bar(13.0, 10.0, 12.8), &prior);

        assert_eq!(state.side, SarSide::Long);
        assert_eq!(state.sar, 8.0);
        assert_eq!(state.extreme_point, 13.0);
        assert_eq!(state.af, 0.02);
    }

    #[test]
    fn test_sar_af_capped() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + 2.0 * i as f64).collect();
        let states = ParabolicSar::default().states(&test_bars(&closes));
        let last = states.last().unwrap();
        assert_eq!(last.side, SarSide::Long);
        assert!((last.af - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_sar_uptrend_is_buy() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let signal = ParabolicSar::default().evaluate(&test_bars(&closes));
        assert_eq!(signal.kind, SarSignal::Buy);
        assert!(signal.detail.starts_with("Price above SAR dots"));
    }

    #[test]
    fn test_sar_downtrend_is_sell() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let signal = ParabolicSar::default().evaluate(&test_bars(&closes));
        assert_eq!(signal.kind, SarSignal::Sell);
        assert!(signal.detail.starts_with("Price below SAR dots"));
    }
}
