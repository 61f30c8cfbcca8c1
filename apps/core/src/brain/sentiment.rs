//! Sentiment classification.
//!
//! The scoring engine sits behind the [`SentimentEngine`] capability so the
//! session never branches on whether one is available: when it is not, the
//! [`NullSentimentEngine`] is plugged in and every text scores 0.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which text is positive.
pub const POSITIVE_THRESHOLD: f32 = 0.05;
/// Score at or below which text is negative.
pub const NEGATIVE_THRESHOLD: f32 = -0.05;

/// Coarse polarity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// Label a compound score in [-1, 1].
    pub fn from_score(score: f32) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A source of compound sentiment scores.
pub trait SentimentEngine: Send + Sync {
    /// Compound score in [-1, 1].
    fn score(&self, text: &str) -> f32;

    /// Whether real analysis is happening behind this engine.
    fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in used when no engine is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSentimentEngine;

impl SentimentEngine for NullSentimentEngine {
    fn score(&self, _text: &str) -> f32 {
        0.0
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Word valences on a -4..4 scale.
const LEXICON: &[(&str, f32)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("brilliant", 2.8),
    ("cheerful", 2.5),
    ("cool", 1.3),
    ("delighted", 3.1),
    ("enjoy", 2.2),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("fantastic", 2.6),
    ("fun", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("kind", 2.4),
    ("like", 1.5),
    ("love", 3.2),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("thrilled", 2.9),
    ("wonderful", 2.7),
    ("yay", 2.4),
    ("afraid", -2.2),
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("anxious", -1.0),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("depressed", -2.3),
    ("disappointed", -1.9),
    ("frightened", -1.9),
    ("frustrated", -2.4),
    ("furious", -2.7),
    ("hate", -2.7),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("irritated", -1.8),
    ("lonely", -2.0),
    ("mad", -2.2),
    ("miserable", -2.8),
    ("nervous", -1.1),
    ("sad", -2.1),
    ("scared", -1.9),
    ("sick", -2.1),
    ("terrible", -2.1),
    ("tired", -1.1),
    ("upset", -1.6),
    ("worried", -1.2),
    ("worst", -3.1),
];

/// Words that scale the valence of the next sentiment word.
const BOOSTERS: &[(&str, f32)] = &[
    ("absolutely", 0.293),
    ("extremely", 0.293),
    ("incredibly", 0.293),
    ("really", 0.293),
    ("so", 0.293),
    ("totally", 0.293),
    ("very", 0.293),
    ("barely", -0.293),
    ("kinda", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "neither", "nor", "cannot", "dont", "don't",
    "isn't", "wasn't", "aren't", "didn't", "doesn't", "won't", "can't",
];

/// Scaling applied to a word preceded by a negation.
const NEGATION_SCALAR: f32 = -0.74;
/// Normalisation constant for the compound score.
const ALPHA: f32 = 15.0;
/// Emphasis added per exclamation mark, capped at four marks.
const EXCLAMATION_BOOST: f32 = 0.292;

/// Valence-lexicon engine: boosters, negation and exclamation emphasis,
/// normalized into [-1, 1].
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconSentimentEngine;

impl LexiconSentimentEngine {
    fn valence(word: &str) -> Option<f32> {
        LEXICON
            .iter()
            .find(|(entry, _)| *entry == word)
            .map(|(_, v)| *v)
    }

    fn boost(word: &str) -> f32 {
        BOOSTERS
            .iter()
            .find(|(entry, _)| *entry == word)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    fn is_negation(word: &str) -> bool {
        NEGATIONS.contains(&word) || word.ends_with("n't")
    }
}

impl SentimentEngine for LexiconSentimentEngine {
    fn score(&self, text: &str) -> f32 {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut sum = 0.0_f32;
        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = Self::valence(token) else {
                continue;
            };

            // Look back up to three tokens for boosters and negations.
            let window = &tokens[i.saturating_sub(3)..i];
            for prior in window {
                let b = Self::boost(prior);
                if b != 0.0 {
                    valence += if valence > 0.0 { b } else { -b };
                }
            }
            if window.iter().any(|w| Self::is_negation(w)) {
                valence *= NEGATION_SCALAR;
            }

            sum += valence;
        }

        if sum == 0.0 {
            return 0.0;
        }

        let marks = text.chars().filter(|c| *c == '!').count().min(4) as f32;
        let emphasis = marks * EXCLAMATION_BOOST;
        sum += if sum > 0.0 { emphasis } else { -emphasis };

        let compound = sum / (sum * sum + ALPHA).sqrt();
        compound.clamp(-1.0, 1.0)
    }
}

/// Adapter that turns engine scores into labels.
///
/// Never fails: a non-finite engine score is treated as 0.
pub struct SentimentClassifier {
    engine: Box<dyn SentimentEngine>,
}

impl SentimentClassifier {
    pub fn new(engine: Box<dyn SentimentEngine>) -> Self {
        Self { engine }
    }

    /// Lexicon engine when `enabled`, null engine otherwise.
    pub fn with_availability(enabled: bool) -> Self {
        if enabled {
            Self::new(Box::new(LexiconSentimentEngine))
        } else {
            Self::new(Box::new(NullSentimentEngine))
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn classify(&self, text: &str) -> (Sentiment, f32) {
        let raw = self.engine.score(text);
        let score = if raw.is_finite() {
            raw.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        (Sentiment::from_score(score), score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(Sentiment::from_score(0.05), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(-0.05), Sentiment::Negative);
        assert_eq!(Sentiment::from_score(0.0499), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(-0.0499), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(0.0), Sentiment::Neutral);
    }

    #[test]
    fn test_lexicon_polarity() {
        let engine = LexiconSentimentEngine;

        assert!(engine.score("I am so happy today") > 0.05);
        assert!(engine.score("this is terrible and I hate it") < -0.05);
        assert_eq!(engine.score("Hello"), 0.0);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let engine = LexiconSentimentEngine;
        assert!(engine.score("I am not happy") < 0.0);
    }

    #[test]
    fn test_booster_strengthens() {
        let engine = LexiconSentimentEngine;
        assert!(engine.score("very good") > engine.score("good"));
    }

    #[test]
    fn test_null_engine_is_neutral() {
        let classifier = SentimentClassifier::with_availability(false);
        assert!(!classifier.is_available());
        assert_eq!(
            classifier.classify("I love this, it is wonderful!"),
            (Sentiment::Neutral, 0.0)
        );
    }

    struct Broken;

    impl SentimentEngine for Broken {
        fn score(&self, _text: &str) -> f32 {
            f32::NAN
        }
    }

    #[test]
    fn test_non_finite_score_degrades_to_neutral() {
        let classifier = SentimentClassifier::new(Box::new(Broken));
        assert_eq!(classifier.classify("anything"), (Sentiment::Neutral, 0.0));
    }
}
