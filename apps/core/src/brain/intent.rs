//! Intent detection using ordered regex rules.
//!
//! Rules are evaluated in declaration order and the first one whose pattern
//! matches wins. There is no scoring: order is the precedence.
//! Name declarations, recall requests and exit words are cross-cutting
//! patterns checked by the session before the table is consulted.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use super::sentiment::Sentiment;
use crate::error::AppError;
use crate::responses::validate_template;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greeting (hello, hi, good morning, etc.)
    Greeting,
    /// Asking how the bot is doing
    HowAreYou,
    /// Asking for the bot's name
    NameQuestion,
    /// Help/Assistance
    Help,
    /// Farewell (bye, see you, farewell, etc.)
    Goodbye,
    /// Small talk about the weather
    Weather,
    /// Praise aimed at the bot
    Compliment,
    /// Anything with a question mark
    Question,
    /// "my name is X" and friends, when it captured the user's name
    NameDeclaration,
    /// A name phrase once the name is already known
    NameResponse,
    /// Reference to an earlier part of the conversation
    Recall,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns a human-readable label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::HowAreYou => "how_are_you",
            Intent::NameQuestion => "name_question",
            Intent::Help => "help",
            Intent::Goodbye => "goodbye",
            Intent::Weather => "weather",
            Intent::Compliment => "compliment",
            Intent::Question => "question",
            Intent::NameDeclaration => "name_declaration",
            Intent::NameResponse => "name_response",
            Intent::Recall => "recall",
        }
    }
}

/// Response templates attached to a rule.
#[derive(Debug, Clone, Copy)]
pub enum TemplateSet {
    /// One list regardless of sentiment.
    Plain(&'static [&'static str]),
    /// Lists keyed by sentiment label. Lookups for a missing label use the
    /// neutral bucket.
    BySentiment(&'static [(Sentiment, &'static [&'static str])]),
}

impl TemplateSet {
    /// Templates to choose from for the given sentiment.
    pub fn for_sentiment(&self, sentiment: Sentiment) -> &'static [&'static str] {
        match self {
            TemplateSet::Plain(list) => list,
            TemplateSet::BySentiment(buckets) => {
                let lookup = |wanted: Sentiment| {
                    buckets
                        .iter()
                        .find(|(label, _)| *label == wanted)
                        .map(|(_, list)| *list)
                };
                lookup(sentiment)
                    .or_else(|| lookup(Sentiment::Neutral))
                    .unwrap_or(&[])
            }
        }
    }

    /// Every template in the set, for validation.
    pub fn all(&self) -> Vec<&'static str> {
        match self {
            TemplateSet::Plain(list) => list.to_vec(),
            TemplateSet::BySentiment(buckets) => buckets
                .iter()
                .flat_map(|(_, list)| list.iter().copied())
                .collect(),
        }
    }
}

/// Declarative rule definition, compiled into a [`Rule`].
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub intent: Intent,
    pub pattern: &'static str,
    /// `None` for detection-only rules: the intent is recorded but response
    /// selection falls through.
    pub templates: Option<TemplateSet>,
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub intent: Intent,
    matcher: Regex,
    pub templates: Option<TemplateSet>,
}

impl Rule {
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// Ordered collection of rules. Intent names are unique.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Compile rule definitions, preserving their order.
    ///
    /// Fails on a duplicated intent, a pattern that does not compile, or a
    /// template with an unknown placeholder.
    pub fn compile(specs: &[RuleSpec]) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(specs.len());

        for spec in specs {
            if !seen.insert(spec.intent) {
                return Err(AppError::Config(format!(
                    "Duplicate intent in rule table: {}",
                    spec.intent
                )));
            }

            if let Some(templates) = &spec.templates {
                for template in templates.all() {
                    validate_template(template)?;
                }
            }

            rules.push(Rule {
                intent: spec.intent,
                matcher: Regex::new(&format!("(?i){}", spec.pattern))?,
                templates: spec.templates,
            });
        }

        Ok(Self { rules })
    }

    #[cfg(test)]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, intent: Intent) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.intent == intent)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// First-match-wins intent matcher over a [`RuleTable`].
pub struct IntentMatcher {
    table: RuleTable,
}

impl IntentMatcher {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Return the earliest declared rule matching the text.
    ///
    /// Callers reject empty input before getting here.
    pub fn first_match(&self, text: &str) -> Option<&Rule> {
        self.table.rules.iter().find(|rule| rule.matches(text))
    }
}

/// A name phrase followed by the word taken as the name.
pub const NAME_PHRASE: &str = r"\b(my name is|i'm|call me|i am)\s+(\w+)";

// Compile patterns once at startup
// NOTE: expect() is acceptable here, the patterns are literals
static NAME_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){}", NAME_PHRASE)).expect("Invalid regex: name declaration pattern")
});

static RECALL_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(remember|recall|you said|we talked|earlier|before)\b")
        .expect("Invalid regex: recall trigger pattern")
});

static EXIT_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(quit|exit|bye|goodbye)\b").expect("Invalid regex: exit pattern")
});

/// Capture the first word after a name-declaration phrase, capitalized.
pub fn extract_name(text: &str) -> Option<String> {
    NAME_DECLARATION
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| capitalize(m.as_str()))
}

pub fn is_recall_request(text: &str) -> bool {
    RECALL_TRIGGER.is_match(text)
}

/// Exit words as whole words, anywhere in the input.
pub fn is_exit_request(text: &str) -> bool {
    EXIT_WORDS.is_match(text)
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
