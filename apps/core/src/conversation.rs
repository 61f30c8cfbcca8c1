//! Per-session conversation state: who the user is, what was said, and how
//! their mood has moved.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::brain::{Intent, Sentiment};

/// Average score at or above which the overall mood is positive.
const MOOD_POSITIVE: f32 = 0.1;
/// Average score at or below which the overall mood is negative.
const MOOD_NEGATIVE: f32 = -0.1;
/// Number of most recent samples compared against the rest for the trend.
const TREND_RECENT: usize = 3;
/// Minimum difference in mean score to call a trend.
const TREND_MARGIN: f32 = 0.1;

/// One user-input / bot-response exchange. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "user")]
    pub user_text: String,
    #[serde(rename = "bot")]
    pub bot_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

/// A sentiment reading taken for one user message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodSample {
    pub timestamp: DateTime<Local>,
    pub sentiment: Sentiment,
    pub score: f32,
}

/// Direction of the mood across the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl MoodTrend {
    pub fn label(&self) -> &'static str {
        match self {
            MoodTrend::Improving => "improving",
            MoodTrend::Declining => "declining",
            MoodTrend::Stable => "stable",
            MoodTrend::InsufficientData => "insufficient_data",
        }
    }
}

/// Derived view over the mood history. Never stored in the state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodSummary {
    pub average_sentiment: Sentiment,
    pub trend: MoodTrend,
    pub average_score: f32,
}

fn mean(scores: &[f32]) -> f32 {
    scores.iter().sum::<f32>() / scores.len().max(1) as f32
}

impl MoodSummary {
    pub fn from_samples(samples: &[MoodSample]) -> Self {
        if samples.is_empty() {
            return Self {
                average_sentiment: Sentiment::Neutral,
                trend: MoodTrend::Stable,
                average_score: 0.0,
            };
        }

        let scores: Vec<f32> = samples.iter().map(|s| s.score).collect();
        let average_score = mean(&scores);

        let average_sentiment = if average_score >= MOOD_POSITIVE {
            Sentiment::Positive
        } else if average_score <= MOOD_NEGATIVE {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };

        let trend = if scores.len() < TREND_RECENT {
            MoodTrend::InsufficientData
        } else {
            let (earlier, recent) = scores.split_at(scores.len() - TREND_RECENT);
            let recent = mean(recent);
            let earlier = mean(earlier);

            if recent > earlier + TREND_MARGIN {
                MoodTrend::Improving
            } else if recent < earlier - TREND_MARGIN {
                MoodTrend::Declining
            } else {
                MoodTrend::Stable
            }
        };

        Self {
            average_sentiment,
            trend,
            average_score,
        }
    }
}

/// State owned by exactly one chat session.
#[derive(Debug, Clone)]
pub struct ConversationState {
    started_at: DateTime<Local>,
    user_name: Option<String>,
    history: Vec<Turn>,
    mood_history: Vec<MoodSample>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            started_at: Local::now(),
            user_name: None,
            history: Vec::new(),
            mood_history: Vec::new(),
        }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Record the user's name. Once known it is never replaced; returns
    /// whether the name was stored.
    pub fn remember_name(&mut self, name: impl Into<String>) -> bool {
        if self.user_name.is_some() {
            return false;
        }
        self.user_name = Some(name.into());
        true
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    #[cfg(test)]
    pub fn mood_history(&self) -> &[MoodSample] {
        &self.mood_history
    }

    pub fn record_mood(&mut self, sentiment: Sentiment, score: f32) {
        self.mood_history.push(MoodSample {
            timestamp: Local::now(),
            sentiment,
            score,
        });
    }

    pub fn mood_summary(&self) -> MoodSummary {
        MoodSummary::from_samples(&self.mood_history)
    }

    /// Distinct keywords across all recorded turns
    pub fn unique_keyword_count(&self) -> usize {
        self.history
            .iter()
            .filter_map(|turn| turn.keywords.as_ref())
            .flatten()
            .collect::<HashSet<_>>()
            .len()
    }
}
