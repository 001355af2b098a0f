use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional reading shared by the trend classifier, MACD and the forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Bullish => "Bullish",
            Direction::Bearish => "Bearish",
            Direction::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parabolic SAR reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SarSignal {
    Buy,
    Sell,
    Hold,
}

impl SarSignal {
    pub fn label(&self) -> &'static str {
        match self {
            SarSignal::Buy => "BUY",
            SarSignal::Sell => "SELL",
            SarSignal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for SarSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// On-balance-volume reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObvSignal {
    /// Volume flow agrees with the price trend.
    Confirmed,
    /// Volume flow disagrees with the price trend.
    Divergence,
}

impl ObvSignal {
    pub fn label(&self) -> &'static str {
        match self {
            ObvSignal::Confirmed => "Confirmed",
            ObvSignal::Divergence => "Divergence",
        }
    }
}

impl fmt::Display for ObvSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Sell => "SELL",
            Recommendation::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of a single indicator: a categorical reading plus an explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSignal<K> {
    pub kind: K,
    pub detail: String,
}

impl<K> IndicatorSignal<K> {
    pub fn new(kind: K, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Degraded reading used when there are fewer bars than the indicator's window.
    pub fn insufficient(kind: K, name: &str, have: usize, need: usize) -> Self {
        Self::new(
            kind,
            format!("Insufficient data for {} (have {} bars, need {})", name, have, need),
        )
    }
}

/// Fused recommendation. Confidence is on a 0-1 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeSignal {
    pub recommendation: Recommendation,
    pub confidence: f64,
}

/// Flat signal bundle returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSignals {
    pub trend: Direction,
    pub trend_detail: String,
    pub sar_signal: SarSignal,
    pub sar_detail: String,
    pub macd_signal: Direction,
    pub macd_detail: String,
    pub obv_signal: ObvSignal,
    pub obv_detail: String,
    pub composite_signal: Recommendation,
    /// Confidence between 0 and 1.
    pub confidence: f64,
}

impl IndicatorSignals {
    pub fn new(
        trend: IndicatorSignal<Direction>,
        sar: IndicatorSignal<SarSignal>,
        macd: IndicatorSignal<Direction>,
        obv: IndicatorSignal<ObvSignal>,
        composite: CompositeSignal,
    ) -> Self {
        Self {
            trend: trend.kind,
            trend_detail: trend.detail,
            sar_signal: sar.kind,
            sar_detail: sar.detail,
            macd_signal: macd.kind,
            macd_detail: macd.detail,
            obv_signal: obv.kind,
            obv_detail: obv.detail,
            composite_signal: composite.recommendation,
            confidence: composite.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Label Serialization Tests
    // =========================================================================

    #[test]
    fn test_direction_serialization() {
        assert_eq!(serde_json::to_string(&Direction::Bullish).unwrap(), "\"Bullish\"");
        assert_eq!(serde_json::to_string(&Direction::Bearish).unwrap(), "\"Bearish\"");
        assert_eq!(serde_json::to_string(&Direction::Neutral).unwrap(), "\"Neutral\"");
    }

    #[test]
    fn test_sar_signal_serialization() {
        assert_eq!(serde_json::to_string(&SarSignal::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&SarSignal::Hold).unwrap(), "\"HOLD\"");
    }

    #[test]
    fn test_obv_signal_serialization() {
        assert_eq!(serde_json::to_string(&ObvSignal::Confirmed).unwrap(), "\"Confirmed\"");
        assert_eq!(serde_json::to_string(&ObvSignal::Divergence).unwrap(), "\"Divergence\"");
    }

    #[test]
    fn test_recommendation_display() {
        assert_eq!(Recommendation::Buy.to_string(), "BUY");
        assert_eq!(Recommendation::Sell.to_string(), "SELL");
        assert_eq!(Recommendation::Hold.to_string(), "HOLD");
    }

    // =========================================================================
    // IndicatorSignal Tests
    // =========================================================================

    #[test]
    fn test_indicator_signal_insufficient() {
        let signal = IndicatorSignal::insufficient(Direction::Neutral, "SMA-50", 12, 50);
        assert_eq!(signal.kind, Direction::Neutral);
        assert_eq!(signal.detail, "Insufficient data for SMA-50 (have 12 bars, need 50)");
    }

    // =========================================================================
    // IndicatorSignals Tests
    // =========================================================================

    #[test]
    fn test_indicator_signals_field_names() {
        let signals = IndicatorSignals::new(
            IndicatorSignal::new(Direction::Bullish, "Price above 50-day SMA"),
            IndicatorSignal::new(SarSignal::Buy, "Price above SAR dots"),
            IndicatorSignal::new(Direction::Bearish, "MACD below signal line"),
            IndicatorSignal::new(ObvSignal::Confirmed, "Volume confirms price trend"),
            CompositeSignal {
                recommendation: Recommendation::Hold,
                confidence: 0.4,
            },
        );

        let json = serde_json::to_string(&signals).unwrap();
        assert!(json.contains("\"trend\":\"Bullish\""));
        assert!(json.contains("\"trend_detail\":\"Price above 50-day SMA\""));
        assert!(json.contains("\"sar_signal\":\"BUY\""));
        assert!(json.contains("\"macd_signal\":\"Bearish\""));
        assert!(json.contains("\"obv_signal\":\"Confirmed\""));
        assert!(json.contains("\"composite_signal\":\"HOLD\""));
        assert!(json.contains("\"confidence\":0.4"));
    }
}
