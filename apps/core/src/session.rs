//! Chat session: runs one turn at a time through the pipeline
//! (sentiment, intent with short-circuits, emotions, response selection)
//! and owns the conversation state for its whole life.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::brain::{
    extract_name, is_exit_request, is_recall_request, recall, search_context, EmotionDetector,
    Emotions, Intent, KeywordExtractor, Rule, Sentiment, SentimentClassifier,
};
use crate::conversation::{ConversationState, MoodSummary, MoodTrend, Turn};
use crate::error::AppError;
use crate::profile::{Profile, Variant};
use crate::responses::{choose, render, ResponseBook, Substitutions, TemplatePicker};
use crate::transcript::{SessionInfo, TranscriptRecord, TranscriptStore};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Processing turns
    Active,
    /// Goodbye said, transcript not yet saved
    Closing,
    /// Saved and done
    Terminated,
}

/// What a call to [`ChatSession::respond`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank input, or the session is no longer active. Nothing changed.
    Ignored,
    /// A normal reply; the turn was recorded.
    Reply(Reply),
    /// The user asked to leave. The session is now closing.
    Farewell(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub sentiment: Option<Sentiment>,
    pub intent: Option<Intent>,
}

/// Runtime knobs that are not part of a variant's tables.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Whether the sentiment/keyword engines are available to the NLP variant
    pub nlp_enabled: bool,
    /// Turns searched by a recall request
    pub context_window: usize,
    /// Turns quoted by a recall request
    pub recall_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            nlp_enabled: true,
            context_window: recall::DEFAULT_WINDOW,
            recall_limit: recall::DEFAULT_LIMIT,
        }
    }
}

/// Aggregate numbers for the `stats` command and the saved transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Elapsed time as `H:MM:SS`
    pub duration: String,
    pub message_count: usize,
    /// `"Unknown"` until the user gives a name
    pub user_name: String,
    pub nlp_enabled: bool,
    pub average_mood: Sentiment,
    pub mood_trend: MoodTrend,
    pub unique_keyword_count: usize,
}

/// Result of closing a session.
#[derive(Debug)]
pub struct ClosingReport {
    pub saved: Result<PathBuf, AppError>,
    pub stats: SessionStats,
}

pub struct ChatSession {
    profile: Profile,
    state: ConversationState,
    classifier: Option<SentimentClassifier>,
    emotions: Option<EmotionDetector>,
    keywords: Option<KeywordExtractor>,
    picker: Box<dyn TemplatePicker>,
    options: SessionOptions,
    phase: Phase,
    ended_at: Option<DateTime<Local>>,
}

impl ChatSession {
    pub fn new(profile: Profile, options: SessionOptions, picker: Box<dyn TemplatePicker>) -> Self {
        let stages = profile.stages;

        let classifier = stages
            .sentiment
            .then(|| SentimentClassifier::with_availability(options.nlp_enabled));
        let emotions = stages.emotions.then(EmotionDetector::new);
        let keywords = stages.keywords.then(|| {
            if options.nlp_enabled {
                KeywordExtractor::new()
            } else {
                KeywordExtractor::disabled()
            }
        });

        info!(
            variant = ?profile.variant,
            nlp = options.nlp_enabled && stages.sentiment,
            "Chat session started"
        );

        Self {
            profile,
            state: ConversationState::new(),
            classifier,
            emotions,
            keywords,
            picker,
            options,
            phase: Phase::Active,
            ended_at: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.profile.variant
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// True when a working sentiment engine backs this session.
    pub fn nlp_enabled(&self) -> bool {
        self.classifier
            .as_ref()
            .is_some_and(SentimentClassifier::is_available)
    }

    /// Process one line of user input.
    pub fn respond(&mut self, input: &str) -> TurnOutcome {
        let text = input.trim();
        if text.is_empty() || self.phase != Phase::Active {
            return TurnOutcome::Ignored;
        }

        if is_exit_request(text) {
            self.phase = Phase::Closing;
            let templates = self.profile.farewell_templates();
            let farewell = self.pick_and_render(templates, None);
            info!("Exit requested, session closing");
            return TurnOutcome::Farewell(farewell);
        }

        let sentiment = self.classifier.as_ref().map(|c| c.classify(text));
        let label = sentiment.map(|(label, _)| label).unwrap_or(Sentiment::Neutral);

        let (bot_text, intent) = self.resolve(text, label);

        let keywords = self.keywords.as_ref().map(|k| k.extract(text));
        let now = Local::now();
        self.state.push_turn(Turn {
            timestamp: now,
            user_text: text.to_string(),
            bot_text: bot_text.clone(),
            sentiment: sentiment.map(|(label, _)| label),
            keywords,
            intent,
        });
        if let Some((label, score)) = sentiment {
            self.state.record_mood(label, score);
        }

        TurnOutcome::Reply(Reply {
            text: bot_text,
            sentiment: sentiment.map(|(label, _)| label),
            intent,
        })
    }

    /// Pick the response for a turn. Resolution order, first applicable wins:
    /// name declaration, recall, sentiment-bucketed rule, plain rule,
    /// dominant emotion, default.
    fn resolve(&mut self, text: &str, sentiment: Sentiment) -> (String, Option<Intent>) {
        let book = self.profile.book;
        let stages = self.profile.stages;

        if stages.capture_names && self.state.user_name().is_none() {
            if let Some(name) = extract_name(text) {
                debug!(%name, "Name declared");
                self.state.remember_name(name);
                let reply = self.pick_and_render(book.name_provided, None);
                return (reply, Some(Intent::NameDeclaration));
            }
        }

        if stages.recall && is_recall_request(text) && !self.state.history().is_empty() {
            let context = search_context(
                text,
                self.state.history(),
                self.options.context_window,
                self.options.recall_limit,
            );
            debug!(%context, "Recall request");
            let reply = self.pick_and_render(book.memory_reference, Some(&context));
            return (reply, Some(Intent::Recall));
        }

        let rule = self.profile.matcher.first_match(text).cloned();
        let emotions = self
            .emotions
            .as_ref()
            .map(|d| d.detect(text))
            .unwrap_or_default();

        debug!(
            intent = ?rule.as_ref().map(|r| r.intent),
            %sentiment,
            emotions = ?emotions,
            "Turn analysed"
        );

        let templates = select_templates(&book, rule.as_ref(), sentiment, &emotions);
        let reply = self.pick_and_render(templates, None);
        (reply, rule.map(|r| r.intent))
    }

    fn pick_and_render(&mut self, templates: &'static [&'static str], context: Option<&str>) -> String {
        let templates = if templates.is_empty() {
            self.profile.book.default
        } else {
            templates
        };
        let template = choose(self.picker.as_mut(), templates).unwrap_or_default();

        let mut subs = Substitutions::new(self.state.user_name());
        if let Some(context) = context {
            subs = subs.with_context(context);
        }
        render(template, &subs)
    }

    /// Handle an external interrupt: same path as an exit request.
    pub fn interrupt(&mut self) -> String {
        if self.phase == Phase::Active {
            info!("Session interrupted");
            self.phase = Phase::Closing;
        }
        let subs = Substitutions::new(self.state.user_name());
        render(self.profile.book.interrupt_farewell, &subs)
    }

    /// Mood analysis, for variants that track sentiment.
    pub fn mood_summary(&self) -> Option<MoodSummary> {
        self.classifier.as_ref().map(|_| self.state.mood_summary())
    }

    pub fn stats(&self) -> SessionStats {
        let end = self.ended_at.unwrap_or_else(Local::now);
        let mood = self.state.mood_summary();

        SessionStats {
            duration: format_duration(end - self.state.started_at()),
            message_count: self.state.history().len(),
            user_name: self.state.user_name().unwrap_or("Unknown").to_string(),
            nlp_enabled: self.nlp_enabled(),
            average_mood: mood.average_sentiment,
            mood_trend: mood.trend,
            unique_keyword_count: self.state.unique_keyword_count(),
        }
    }

    /// Everything needed to persist the conversation so far.
    pub fn transcript(&self) -> TranscriptRecord {
        TranscriptRecord {
            session_info: SessionInfo {
                start_time: self.state.started_at(),
                end_time: self.ended_at.unwrap_or_else(Local::now),
                user_name: self.state.user_name().map(str::to_string),
                nlp_enabled: self.nlp_enabled(),
            },
            conversation: self.state.history().to_vec(),
            mood_analysis: self.state.mood_summary(),
            stats: self.stats(),
        }
    }

    /// Persist the transcript without ending the session.
    pub fn save(&self, store: &dyn TranscriptStore) -> Result<PathBuf, AppError> {
        store.save(self.variant(), &self.transcript())
    }

    /// Save the transcript and terminate. A failed save is reported in the
    /// returned report; the session terminates either way.
    pub fn close(&mut self, store: &dyn TranscriptStore) -> ClosingReport {
        if self.phase == Phase::Terminated {
            return ClosingReport {
                saved: Err(AppError::Internal("Session already closed".to_string())),
                stats: self.stats(),
            };
        }

        self.phase = Phase::Closing;
        self.ended_at = Some(Local::now());

        let saved = self.save(store);
        match &saved {
            Ok(path) => info!(path = %path.display(), "Transcript saved"),
            Err(e) => error!("Failed to save transcript: {}", e),
        }

        self.phase = Phase::Terminated;
        ClosingReport {
            saved,
            stats: self.stats(),
        }
    }
}

/// Templates for steps three to six of the resolution order.
fn select_templates(
    book: &ResponseBook,
    rule: Option<&Rule>,
    sentiment: Sentiment,
    emotions: &Emotions,
) -> &'static [&'static str] {
    if let Some(set) = rule.and_then(|r| r.templates) {
        let templates = set.for_sentiment(sentiment);
        if !templates.is_empty() {
            return templates;
        }
    }

    if let Some(emotion) = emotions.dominant() {
        let templates = book.emotion(emotion);
        if !templates.is_empty() {
            return templates;
        }
    }

    book.default
}

/// `H:MM:SS`, whole seconds.
fn format_duration(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
