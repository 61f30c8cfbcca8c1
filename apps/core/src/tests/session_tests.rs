//! Session Tests
//!
//! End-to-end turns through each variant with deterministic template picks,
//! plus the Active -> Closing -> Terminated lifecycle.

use std::cell::RefCell;
use std::path::PathBuf;

use crate::brain::{Intent, Sentiment};
use crate::error::AppError;
use crate::profile::{Profile, Variant};
use crate::responses::FirstPicker;
use crate::session::{ChatSession, Phase, SessionOptions, TurnOutcome};
use crate::transcript::{TranscriptRecord, TranscriptStore};

fn session_with(variant: Variant, options: SessionOptions) -> ChatSession {
    let profile = Profile::build(variant).unwrap();
    ChatSession::new(profile, options, Box::new(FirstPicker))
}

fn session(variant: Variant) -> ChatSession {
    session_with(variant, SessionOptions::default())
}

fn reply_text(outcome: TurnOutcome) -> String {
    match outcome {
        TurnOutcome::Reply(reply) => reply.text,
        other => panic!("Expected a reply, got {:?}", other),
    }
}

/// Keeps every record it is given.
#[derive(Default)]
struct RecordingStore {
    saved: RefCell<Vec<(Variant, TranscriptRecord)>>,
}

impl TranscriptStore for RecordingStore {
    fn save(&self, variant: Variant, record: &TranscriptRecord) -> Result<PathBuf, AppError> {
        self.saved.borrow_mut().push((variant, record.clone()));
        Ok(PathBuf::from("memory"))
    }
}

struct FailingStore;

impl TranscriptStore for FailingStore {
    fn save(&self, _variant: Variant, _record: &TranscriptRecord) -> Result<PathBuf, AppError> {
        Err(AppError::Persistence("disk full".to_string()))
    }
}

#[cfg(test)]
mod simple_tests {
    use super::*;

    #[test]
    fn test_greeting() {
        let mut bot = session(Variant::Simple);

        let outcome = bot.respond("Hello");
        assert_eq!(
            outcome,
            TurnOutcome::Reply(crate::session::Reply {
                text: "Hello! How can I help you today?".to_string(),
                sentiment: None,
                intent: Some(Intent::Greeting),
            })
        );
        assert_eq!(bot.state().history().len(), 1);
        assert_eq!(bot.state().history()[0].user_text, "Hello");
    }

    #[test]
    fn test_default_when_nothing_matches() {
        let mut bot = session(Variant::Simple);
        assert_eq!(reply_text(bot.respond("purple elephants")), "That's interesting! Tell me more.");
    }

    #[test]
    fn test_does_not_capture_names() {
        let mut bot = session(Variant::Simple);
        bot.respond("my name is Sam");
        assert_eq!(bot.state().user_name(), None);
        assert!(bot.mood_summary().is_none());
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut bot = session(Variant::Simple);
        assert_eq!(bot.respond("   "), TurnOutcome::Ignored);
        assert_eq!(bot.respond(""), TurnOutcome::Ignored);
        assert!(bot.state().history().is_empty());
        assert_eq!(bot.phase(), Phase::Active);
    }
}

#[cfg(test)]
mod enhanced_tests {
    use super::*;

    #[test]
    fn test_name_declaration_and_personalised_greeting() {
        let mut bot = session(Variant::Enhanced);

        let text = reply_text(bot.respond("my name is sam"));
        assert_eq!(text, "Nice to meet you, Sam! I'll remember that.");
        assert_eq!(bot.state().user_name(), Some("Sam"));
        assert_eq!(bot.state().history()[0].intent, Some(Intent::NameDeclaration));

        assert_eq!(reply_text(bot.respond("hello")), "Hello Sam! How can I help you today?");
    }

    #[test]
    fn test_name_is_never_replaced() {
        let mut bot = session(Variant::Enhanced);
        bot.respond("my name is Sam");

        let text = reply_text(bot.respond("call me Alex"));
        assert_eq!(text, "That's interesting Sam! Tell me more about that.");
        assert_eq!(bot.state().user_name(), Some("Sam"));
    }

    #[test]
    fn test_recall_quotes_earlier_turn() {
        let mut bot = session(Variant::Enhanced);
        bot.respond("my name is Sam");
        bot.respond("I love pizza");

        let text = reply_text(bot.respond("do you remember pizza"));
        assert_eq!(
            text,
            "Yes, I remember we talked about that! You said: 'I love pizza'"
        );
        assert_eq!(bot.state().history()[2].intent, Some(Intent::Recall));
    }

    #[test]
    fn test_recall_fallback() {
        let mut bot = session(Variant::Enhanced);
        bot.respond("hello");

        let text = reply_text(bot.respond("remember the zoo"));
        assert_eq!(
            text,
            "Yes, I remember we talked about that! something we discussed earlier"
        );
    }

    #[test]
    fn test_recall_needs_history() {
        let mut bot = session(Variant::Enhanced);
        let text = reply_text(bot.respond("do you remember"));
        assert_eq!(text, "That's interesting! Tell me more about that.");
        assert_eq!(bot.state().history()[0].intent, None);
    }

    #[test]
    fn test_recall_limit_option() {
        let options = SessionOptions {
            recall_limit: 1,
            ..SessionOptions::default()
        };
        let mut bot = session_with(Variant::Enhanced, options);
        bot.respond("pizza on monday");
        bot.respond("pizza on friday");

        let text = reply_text(bot.respond("remember pizza"));
        assert_eq!(
            text,
            "Yes, I remember we talked about that! You said: 'pizza on monday'"
        );
    }
}

#[cfg(test)]
mod nlp_tests {
    use super::*;

    #[test]
    fn test_joy_after_name() {
        let mut bot = session(Variant::Nlp);
        bot.respond("my name is Sam");

        match bot.respond("I am so happy today") {
            TurnOutcome::Reply(reply) => {
                assert_eq!(reply.text, "That's wonderful Sam! I'm so happy to hear that!");
                assert_eq!(reply.sentiment, Some(Sentiment::Positive));
                assert_eq!(reply.intent, Some(Intent::NameResponse));
            }
            other => panic!("Expected a reply, got {:?}", other),
        }

        let turn = &bot.state().history()[1];
        assert_eq!(turn.sentiment, Some(Sentiment::Positive));
        assert!(turn.keywords.as_ref().unwrap().contains(&"happy".to_string()));
    }

    #[test]
    fn test_name_phrase_after_name_known_is_detection_only() {
        let mut bot = session(Variant::Nlp);
        bot.respond("my name is Sam");

        match bot.respond("I'm curious, what's the time?") {
            TurnOutcome::Reply(reply) => {
                assert_eq!(reply.intent, Some(Intent::NameResponse));
                assert_eq!(
                    reply.text,
                    "That's interesting Sam! Tell me more about your thoughts on that."
                );
            }
            other => panic!("Expected a reply, got {:?}", other),
        }
        assert_eq!(bot.state().user_name(), Some("Sam"));

        // Falls through to the emotion, ahead of the compliment rule
        let text = reply_text(bot.respond("I'm glad you are a great bot"));
        assert_eq!(text, "That's wonderful Sam! I'm so happy to hear that!");
    }

    #[test]
    fn test_no_recall_short_circuit() {
        let mut bot = session(Variant::Nlp);
        bot.respond("hello");

        match bot.respond("I was happy before") {
            TurnOutcome::Reply(reply) => {
                assert_eq!(reply.text, "That's wonderful! I'm so happy to hear that!");
                assert_eq!(reply.intent, None);
            }
            other => panic!("Expected a reply, got {:?}", other),
        }
    }

    #[test]
    fn test_greeting_bucketed_by_sentiment() {
        let mut bot = session(Variant::Nlp);
        assert_eq!(reply_text(bot.respond("hello")), "Hello! How can I help you today?");

        let text = reply_text(bot.respond("hello, I feel sad"));
        assert_eq!(
            text,
            "Hello. I sense you might be having a tough time. I'm here to listen."
        );
    }

    #[test]
    fn test_question_rule_beats_emotion() {
        let mut bot = session(Variant::Nlp);
        let text = reply_text(bot.respond("why is the sky blue?"));
        assert_eq!(text, "That's a thoughtful question! Let me think about that...");
    }

    #[test]
    fn test_compliment() {
        let mut bot = session(Variant::Nlp);
        let text = reply_text(bot.respond("you are a great bot"));
        assert_eq!(text, "Thank you so much! That's very kind of you to say.");
    }

    #[test]
    fn test_detection_only_intent_uses_default() {
        let mut bot = session(Variant::Nlp);
        match bot.respond("what's your name") {
            TurnOutcome::Reply(reply) => {
                assert_eq!(reply.intent, Some(Intent::NameQuestion));
                assert_eq!(
                    reply.text,
                    "That's interesting! Tell me more about your thoughts on that."
                );
            }
            other => panic!("Expected a reply, got {:?}", other),
        }
    }

    #[test]
    fn test_mood_sample_per_turn() {
        let mut bot = session(Variant::Nlp);
        bot.respond("my name is Sam");
        bot.respond("this is wonderful");
        bot.respond("hello");

        assert_eq!(bot.state().mood_history().len(), 3);
        let mood = bot.mood_summary().unwrap();
        assert_eq!(mood.average_sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_nlp_disabled_falls_back_to_neutral() {
        let options = SessionOptions {
            nlp_enabled: false,
            ..SessionOptions::default()
        };
        let mut bot = session_with(Variant::Nlp, options);
        assert!(!bot.nlp_enabled());

        let text = reply_text(bot.respond("hello, I feel sad"));
        assert_eq!(text, "Hello! How can I help you today?");

        let turn = &bot.state().history()[0];
        assert_eq!(turn.sentiment, Some(Sentiment::Neutral));
        assert_eq!(
            turn.keywords.as_deref(),
            Some(&["hello,".to_string(), "I".into(), "feel".into(), "sad".into()][..])
        );
    }

    #[test]
    fn test_stats() {
        let mut bot = session(Variant::Nlp);
        bot.respond("hello there");
        bot.respond("I enjoy hiking");

        let stats = bot.stats();
        assert_eq!(stats.message_count, 2);
        assert_eq!(stats.user_name, "Unknown");
        assert!(stats.nlp_enabled);
        assert_eq!(stats.unique_keyword_count, 3);
    }

    #[test]
    fn test_plural_keywords_counted_once() {
        let mut bot = session(Variant::Nlp);
        bot.respond("I like cats");
        bot.respond("my cat sleeps");

        assert_eq!(
            bot.state().history()[0].keywords.as_deref(),
            Some(&["like".to_string(), "cat".into()][..])
        );
        // like, cat, sleep
        assert_eq!(bot.stats().unique_keyword_count, 3);
    }
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_exit_word_closes() {
        let mut bot = session(Variant::Enhanced);
        bot.respond("my name is Sam");

        let outcome = bot.respond("ok bye");
        assert_eq!(
            outcome,
            TurnOutcome::Farewell("Goodbye Sam! It was wonderful chatting with you!".to_string())
        );
        assert_eq!(bot.phase(), Phase::Closing);
        // The goodbye is not a recorded turn
        assert_eq!(bot.state().history().len(), 1);

        assert_eq!(bot.respond("hello again"), TurnOutcome::Ignored);
    }

    #[test]
    fn test_close_saves_and_terminates() {
        let mut bot = session(Variant::Nlp);
        bot.respond("hello");
        bot.respond("bye");

        let store = RecordingStore::default();
        let report = bot.close(&store);

        assert!(report.saved.is_ok());
        assert_eq!(bot.phase(), Phase::Terminated);
        assert_eq!(report.stats.message_count, 1);

        let saved = store.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, Variant::Nlp);
        assert_eq!(saved[0].1.conversation.len(), 1);
        assert!(saved[0].1.session_info.nlp_enabled);
    }

    #[test]
    fn test_failed_save_still_terminates() {
        let mut bot = session(Variant::Simple);
        bot.respond("hello");

        let report = bot.close(&FailingStore);
        assert!(matches!(report.saved, Err(AppError::Persistence(_))));
        assert_eq!(bot.phase(), Phase::Terminated);
    }

    #[test]
    fn test_close_twice() {
        let mut bot = session(Variant::Simple);
        let store = RecordingStore::default();

        assert!(bot.close(&store).saved.is_ok());
        assert!(matches!(bot.close(&store).saved, Err(AppError::Internal(_))));
        assert_eq!(store.saved.borrow().len(), 1);
    }

    #[test]
    fn test_interrupt() {
        let mut bot = session(Variant::Nlp);
        let text = bot.interrupt();
        assert_eq!(text, "Goodbye! Thanks for the enlightening conversation!");
        assert_eq!(bot.phase(), Phase::Closing);
    }
}
