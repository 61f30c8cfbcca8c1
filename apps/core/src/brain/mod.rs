//! # Brain Module
//!
//! Fast, rule-based analysis of a single user message.
//!
//! ## Components
//! - `intent`: ordered regex rules, first match wins
//! - `sentiment`: polarity labels over a pluggable scoring engine
//! - `emotion`: keyword-based emotion categories
//! - `keywords`: stop-word filtered keyword extraction
//! - `recall`: search of earlier turns for a memory reference

pub mod emotion;
pub mod intent;
pub mod keywords;
pub mod recall;
pub mod sentiment;

// Re-export main types for convenience
pub use emotion::{Emotion, EmotionDetector, Emotions};
pub use intent::{
    extract_name, is_exit_request, is_recall_request, Intent, IntentMatcher, Rule, RuleSpec,
    RuleTable, TemplateSet,
};
pub use keywords::KeywordExtractor;
pub use recall::search_context;
pub use sentiment::{Sentiment, SentimentClassifier};
