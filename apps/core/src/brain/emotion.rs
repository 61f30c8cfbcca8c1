//! Keyword-based emotion detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotion categories, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [Emotion::Joy, Emotion::Sadness, Emotion::Anger, Emotion::Fear];

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &["happy", "excited", "glad", "thrilled", "delighted", "cheerful"],
            Emotion::Sadness => &["sad", "depressed", "upset", "disappointed", "down", "blue"],
            Emotion::Anger => &["angry", "mad", "furious", "annoyed", "frustrated", "irritated"],
            Emotion::Fear => &["scared", "afraid", "worried", "anxious", "nervous", "frightened"],
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Emotions found in a text, kept in category order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emotions(Vec<Emotion>);

impl Emotions {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, emotion: Emotion) -> bool {
        self.0.contains(&emotion)
    }

    /// The emotion that drives response selection.
    pub fn dominant(&self) -> Option<Emotion> {
        self.0.first().copied()
    }
}

/// Substring keyword matcher. A category is present when any of its
/// keywords occurs anywhere in the lower-cased text.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmotionDetector;

impl EmotionDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> Emotions {
        let lower = text.to_lowercase();
        Emotions(
            Emotion::ALL
                .into_iter()
                .filter(|emotion| emotion.keywords().iter().any(|kw| lower.contains(kw)))
                .collect(),
        )
    }
}
