//! Lexicon-based headline sentiment.
//!
//! Each headline gets a compound polarity in [-1, 1] from a finance-tuned
//! word list with negation and intensity modifiers; a ticker's score is the
//! mean over its recent headlines.

use std::collections::HashMap;

use crate::types::{round_to, SentimentLabel, SentimentResult};

/// Headlines fetched per ticker.
pub const HEADLINE_LIMIT: usize = 10;

/// Headlines echoed back in the response.
const TOP_HEADLINES: usize = 5;

/// Normalisation constant for the compound score.
const ALPHA: f64 = 15.0;

/// Scale applied to a word preceded by a negation.
const NEGATION_SCALAR: f64 = -0.74;

/// Valence added by an intensifier or removed by a dampener.
const BOOST: f64 = 0.293;

/// How many preceding tokens are inspected for modifiers.
const MODIFIER_WINDOW: usize = 3;

/// Word valences on a -4 to +4 scale.
const LEXICON: &[(&str, f64)] = &[
    // positive
    ("beat", 1.8),
    ("beats", 1.8),
    ("boom", 2.0),
    ("booming", 2.2),
    ("bullish", 2.3),
    ("buy", 1.0),
    ("climb", 1.4),
    ("climbs", 1.4),
    ("gain", 2.0),
    ("gains", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("growth", 1.7),
    ("high", 0.8),
    ("jump", 1.5),
    ("jumps", 1.5),
    ("optimism", 2.0),
    ("optimistic", 2.3),
    ("outperform", 2.0),
    ("profit", 1.9),
    ("profitable", 2.1),
    ("rally", 2.0),
    ("rallies", 2.0),
    ("record", 1.2),
    ("rebound", 1.6),
    ("rise", 1.2),
    ("rises", 1.2),
    ("soar", 2.5),
    ("soars", 2.5),
    ("strong", 2.3),
    ("success", 2.7),
    ("surge", 2.2),
    ("surges", 2.2),
    ("upgrade", 1.9),
    ("upgraded", 1.9),
    ("win", 2.8),
    ("wins", 2.7),
    // negative
    ("bankrupt", -2.6),
    ("bankruptcy", -2.6),
    ("bearish", -2.3),
    ("collapse", -2.8),
    ("concern", -1.4),
    ("concerns", -1.4),
    ("crash", -2.7),
    ("crashes", -2.7),
    ("cut", -1.1),
    ("cuts", -1.1),
    ("decline", -1.5),
    ("declines", -1.5),
    ("downgrade", -1.9),
    ("downgraded", -1.9),
    ("drop", -1.1),
    ("drops", -1.1),
    ("fall", -1.2),
    ("falls", -1.2),
    ("fear", -2.2),
    ("fears", -2.2),
    ("fraud", -2.8),
    ("lawsuit", -1.9),
    ("layoffs", -2.0),
    ("loss", -1.3),
    ("losses", -1.7),
    ("miss", -1.2),
    ("misses", -1.2),
    ("plunge", -2.3),
    ("plunges", -2.3),
    ("recession", -2.2),
    ("risk", -1.1),
    ("selloff", -2.0),
    ("slump", -2.0),
    ("slumps", -2.0),
    ("tumble", -1.9),
    ("tumbles", -1.9),
    ("warning", -1.4),
    ("weak", -1.9),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without", "cannot",
];

const INTENSIFIERS: &[&str] = &[
    "very",
    "extremely",
    "sharply",
    "significantly",
    "hugely",
    "massively",
    "strongly",
    "highly",
    "most",
    "biggest",
];

const DAMPENERS: &[&str] = &["slightly", "somewhat", "marginally", "barely", "modestly", "less"];

/// Stateless headline scorer. Construct once and share.
pub struct SentimentAnalyzer {
    lexicon: HashMap<&'static str, f64>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
        }
    }

    /// Compound polarity of one piece of text, in [-1, 1].
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let pivot = tokens.iter().position(|t| t == "but");

        let sum: f64 = tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| {
                let base = *self.lexicon.get(token.as_str())?;
                let mut valence = base + modifier_boost(&tokens, i, base);
                if is_negated(&tokens, i) {
                    valence *= NEGATION_SCALAR;
                }
                match pivot {
                    Some(p) if i < p => valence *= 0.5,
                    Some(p) if i > p => valence *= 1.5,
                    _ => {}
                }
                Some(valence)
            })
            .sum();

        normalize(sum)
    }

    /// Average polarity over `headlines`, labelled.
    pub fn score_headlines(&self, headlines: &[String]) -> SentimentResult {
        if headlines.is_empty() {
            return SentimentResult::empty();
        }

        let total: f64 = headlines.iter().map(|h| self.polarity(h)).sum();
        let score = total / headlines.len() as f64;

        SentimentResult {
            score: round_to(score, 4),
            label: SentimentLabel::from_score(score),
            headline_count: headlines.len(),
            top_headlines: headlines.iter().take(TOP_HEADLINES).cloned().collect(),
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .trim_matches('\'')
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

fn preceding(tokens: &[String], index: usize) -> &[String] {
    &tokens[index.saturating_sub(MODIFIER_WINDOW)..index]
}

fn is_negated(tokens: &[String], index: usize) -> bool {
    preceding(tokens, index)
        .iter()
        .any(|t| NEGATIONS.contains(&t.as_str()) || t.ends_with("n't"))
}

/// Intensity change from modifiers just before `index`, signed like `valence`.
fn modifier_boost(tokens: &[String], index: usize, valence: f64) -> f64 {
    let sign = valence.signum();
    preceding(tokens, index)
        .iter()
        .map(|t| {
            if INTENSIFIERS.contains(&t.as_str()) {
                BOOST * sign
            } else if DAMPENERS.contains(&t.as_str()) {
                -BOOST * sign
            } else {
                0.0
            }
        })
        .sum()
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}
