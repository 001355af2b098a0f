//! Vote-based fusion of the indicator readings and the forecast direction.

use crate::types::{round_to, CompositeSignal, Direction, ObvSignal, Recommendation, SarSignal};

/// Total number of votes a recommendation's confidence is measured against.
const VOTES: f64 = 5.0;

/// Votes needed to leave HOLD.
const DECISIVE: f64 = 3.0;

/// Weight OBV divergence moves from the bullish to the bearish tally.
const DIVERGENCE_PENALTY: f64 = 0.5;

/// Bullish and bearish tallies after the OBV adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tally {
    pub bullish: f64,
    pub bearish: f64,
}

impl Tally {
    pub fn count(
        trend: Direction,
        sar: SarSignal,
        macd: Direction,
        obv: ObvSignal,
        forecast: Direction,
    ) -> Self {
        let mut tally = Self {
            bullish: 0.0,
            bearish: 0.0,
        };

        for direction in [trend, macd, forecast] {
            match direction {
                Direction::Bullish => tally.bullish += 1.0,
                Direction::Bearish => tally.bearish += 1.0,
                Direction::Neutral => {}
            }
        }
        match sar {
            SarSignal::Buy => tally.bullish += 1.0,
            SarSignal::Sell => tally.bearish += 1.0,
            SarSignal::Hold => {}
        }

        if obv == ObvSignal::Divergence {
            tally.bullish = (tally.bullish - DIVERGENCE_PENALTY).max(0.0);
            tally.bearish = (tally.bearish + DIVERGENCE_PENALTY).max(0.0);
        }

        tally
    }
}

/// Fuse four indicator readings and the forecast direction into one
/// recommendation.
///
/// BUY needs three bullish votes and is checked first, then SELL on three
/// bearish votes. Anything else is HOLD with the larger tally as its
/// confidence.
pub fn composite_signal(
    trend: Direction,
    sar: SarSignal,
    macd: Direction,
    obv: ObvSignal,
    forecast: Direction,
) -> CompositeSignal {
    let Tally { bullish, bearish } = Tally::count(trend, sar, macd, obv, forecast);

    if bullish >= DECISIVE {
        CompositeSignal {
            recommendation: Recommendation::Buy,
            confidence: bullish / VOTES,
        }
    } else if bearish >= DECISIVE {
        CompositeSignal {
            recommendation: Recommendation::Sell,
            confidence: bearish / VOTES,
        }
    } else {
        CompositeSignal {
            recommendation: Recommendation::Hold,
            confidence: round_to(bullish.max(bearish) / VOTES, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIONS: [Direction; 3] = [Direction::Bullish, Direction::Bearish, Direction::Neutral];
    const SARS: [SarSignal; 3] = [SarSignal::Buy, SarSignal::Sell, SarSignal::Hold];
    const OBVS: [ObvSignal; 2] = [ObvSignal::Confirmed, ObvSignal::Divergence];

    #[test]
    fn test_unanimous_buy() {
        let signal = composite_signal(
            Direction::Bullish,
            SarSignal::Buy,
            Direction::Bullish,
            ObvSignal::Confirmed,
            Direction::Bullish,
        );
        assert_eq!(signal.recommendation, Recommendation::Buy);
        assert_eq!(signal.confidence, 0.8);
    }

    #[test]
    fn test_divergence_turns_three_votes_into_hold() {
        let signal = composite_signal(
            Direction::Bullish,
            SarSignal::Buy,
            Direction::Bullish,
            ObvSignal::Divergence,
            Direction::Neutral,
        );
        assert_eq!(
            Tally::count(
                Direction::Bullish,
                SarSignal::Buy,
                Direction::Bullish,
                ObvSignal::Divergence,
                Direction::Neutral,
            ),
            Tally {
                bullish: 2.5,
                bearish: 0.5
            }
        );
        assert_eq!(signal.recommendation, Recommendation::Hold);
        assert_eq!(signal.confidence, 0.5);
    }

    #[test]
    fn test_divergence_strengthens_sell() {
        let signal = composite_signal(
            Direction::Bearish,
            SarSignal::Sell,
            Direction::Bearish,
            ObvSignal::Divergence,
            Direction::Bearish,
        );
        assert_eq!(signal.recommendation, Recommendation::Sell);
        assert_eq!(signal.confidence, 0.9);
    }

    #[test]
    fn test_divergence_floor_at_zero() {
        let tally = Tally::count(
            Direction::Bearish,
            SarSignal::Sell,
            Direction::Neutral,
            ObvSignal::Divergence,
            Direction::Neutral,
        );
        assert_eq!(tally.bullish, 0.0);
        assert_eq!(tally.bearish, 2.5);
    }

    #[test]
    fn test_all_neutral_is_hold_with_zero_confidence() {
        let signal = composite_signal(
            Direction::Neutral,
            SarSignal::Hold,
            Direction::Neutral,
            ObvSignal::Confirmed,
            Direction::Neutral,
        );
        assert_eq!(signal.recommendation, Recommendation::Hold);
        assert_eq!(signal.confidence, 0.0);
    }

    #[test]
    fn test_confidence_bounded_for_every_combination() {
        let mut cases = 0;
        for trend in DIRECTIONS {
            for sar in SARS {
                for macd in DIRECTIONS {
                    for obv in OBVS {
                        for forecast in DIRECTIONS {
                            let signal = composite_signal(trend, sar, macd, obv, forecast);
                            assert!(
                                (0.0..=1.0).contains(&signal.confidence),
                                "confidence {} out of range",
                                signal.confidence
                            );
                            cases += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(cases, 3 * 3 * 3 * 2 * 3);
    }
}
