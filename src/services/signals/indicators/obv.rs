//! On-Balance Volume (OBV) divergence indicator.

use crate::services::signals::Indicator;
use crate::types::{Bar, IndicatorSignal, ObvSignal};

/// OBV (On-Balance Volume) divergence detector.
///
/// Cumulative volume indicator:
/// - If close > previous close: OBV += volume
/// - If close < previous close: OBV -= volume
///
/// Compares the change in OBV with the change in price over the lookback.
/// When only one of them is rising the volume flow disagrees with price.
pub struct ObvDivergence {
    lookback: usize,
}

impl Default for ObvDivergence {
    fn default() -> Self {
        Self { lookback: 20 }
    }
}

impl ObvDivergence {
    /// Running OBV, starting at zero on the first bar.
    pub fn series(bars: &[Bar]) -> Vec<f64> {
        let mut obv = 0.0;
        let mut values = Vec::with_capacity(bars.len());
        for (i, bar) in bars.iter().enumerate() {
            if i > 0 {
                let previous = bars[i - 1].close;
                if bar.close > previous {
                    obv += bar.volume;
                } else if bar.close < previous {
                    obv -= bar.volume;
                }
            }
            values.push(obv);
        }
        values
    }
}

impl Indicator for ObvDivergence {
    type Reading = ObvSignal;

    fn name(&self) -> &str {
        "OBV"
    }

    fn min_periods(&self) -> usize {
        self.lookback
    }

    fn evaluate(&self, bars: &[Bar]) -> IndicatorSignal<ObvSignal> {
        let n = bars.len();
        if n < self.min_periods() || self.lookback == 0 {
            return IndicatorSignal::insufficient(
                ObvSignal::Confirmed,
                self.name(),
                n,
                self.min_periods(),
            );
        }

        let obv = Self::series(bars);
        let start = n - self.lookback;
        let price_rising = bars[n - 1].close - bars[start].close > 0.0;
        let obv_rising = obv[n - 1] - obv[start] > 0.0;

        match (price_rising, obv_rising) {
            (true, false) => IndicatorSignal::new(
                ObvSignal::Divergence,
                "Price rising but volume falling (weakness)",
            ),
            (false, true) => IndicatorSignal::new(
                ObvSignal::Divergence,
                "Price falling but volume rising (accumulation)",
            ),
            _ => IndicatorSignal::new(ObvSignal::Confirmed, "Volume confirms price trend"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::test_bars;

    fn with_volumes(closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
        test_bars(closes)
            .into_iter()
            .zip(volumes)
            .map(|(bar, &volume)| Bar { volume, ..bar })
            .collect()
    }

    #[test]
    fn test_obv_series() {
        let bars = with_volumes(&[10.0, 11.0, 11.0, 9.0], &[100.0, 200.0, 300.0, 50.0]);
        assert_eq!(ObvDivergence::series(&bars), vec![0.0, 200.0, 200.0, 150.0]);
    }

    #[test]
    fn test_obv_insufficient_data() {
        let signal = ObvDivergence::default().evaluate(&test_bars(&[10.0; 19]));
        assert_eq!(signal.kind, ObvSignal::Confirmed);
        assert_eq!(signal.detail, "Insufficient data for OBV (have 19 bars, need 20)");
    }

    #[test]
    fn test_obv_confirms_rally_on_volume() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let signal = ObvDivergence::default().evaluate(&test_bars(&closes));
        assert_eq!(signal.kind, ObvSignal::Confirmed);
        assert_eq!(signal.detail, "Volume confirms price trend");
    }

    #[test]
    fn test_obv_weakness_when_volume_dries_up() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let mut volumes = vec![1_000.0; 10];
        volumes.extend(vec![0.0; 20]);
        let signal = ObvDivergence::default().evaluate(&with_volumes(&closes, &volumes));
        assert_eq!(signal.kind, ObvSignal::Divergence);
        assert_eq!(signal.detail, "Price rising but volume falling (weakness)");
    }

    #[test]
    fn test_obv_accumulation() {
        // Price drifts down overall while up-days carry the heavy volume
        let closes: Vec<f64> = (0..30)
            .map(|i| 100.0 - i as f64 * 0.5 + if i % 2 == 0 { 1.0 } else { 0.0 })
            .collect();
        let volumes: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 5_000.0 } else { 100.0 })
            .collect();
        let signal = ObvDivergence::default().evaluate(&with_volumes(&closes, &volumes));
        assert_eq!(signal.kind, ObvSignal::Divergence);
        assert_eq!(signal.detail, "Price falling but volume rising (accumulation)");
    }

    #[test]
    fn test_obv_confirms_decline() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let signal = ObvDivergence::default().evaluate(&test_bars(&closes));
        assert_eq!(signal.kind, ObvSignal::Confirmed);
    }

    #[test]
    fn test_obv_negative_volume_reads_as_divergence() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let signal = ObvDivergence::default().evaluate(&with_volumes(&closes, &[-1_000.0; 30]));
        assert_eq!(signal.kind, ObvSignal::Divergence);
        assert_eq!(signal.detail, "Price rising but volume falling (weakness)");
    }
}
