//! Persistence Tests
//!
//! Transcripts written by `JsonTranscriptStore` into temporary directories.

use serde_json::Value;
use std::fs;
use tempfile::TempDir;

use crate::error::AppError;
use crate::profile::{Profile, Variant};
use crate::responses::FirstPicker;
use crate::session::{ChatSession, SessionOptions};
use crate::transcript::{JsonTranscriptStore, TranscriptStore};

fn session(variant: Variant) -> ChatSession {
    let profile = Profile::build(variant).unwrap();
    ChatSession::new(profile, SessionOptions::default(), Box::new(FirstPicker))
}

fn setup_store() -> (TempDir, JsonTranscriptStore) {
    let tmp = tempfile::tempdir().unwrap();
    let store = JsonTranscriptStore::new(tmp.path().join("transcripts"));
    (tmp, store)
}

#[cfg(test)]
mod json_store_tests {
    use super::*;

    #[test]
    fn test_close_writes_readable_transcript() {
        let (_tmp, store) = setup_store();
        let mut bot = session(Variant::Nlp);
        bot.respond("my name is Sam");
        bot.respond("I am so happy today");

        let report = bot.close(&store);
        let path = report.saved.unwrap();

        assert!(path.starts_with(store.dir()));
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("nlp_conversation_"), "{}", file_name);
        assert!(file_name.ends_with(".json"));

        let loaded = JsonTranscriptStore::load(&path).unwrap();
        assert_eq!(loaded, bot.transcript());
        assert_eq!(loaded.session_info.user_name.as_deref(), Some("Sam"));
        assert_eq!(loaded.conversation.len(), 2);
    }

    #[test]
    fn test_json_field_names() {
        let (_tmp, store) = setup_store();
        let mut bot = session(Variant::Nlp);
        bot.respond("hello");
        let path = bot.close(&store).saved.unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["session_info"]["nlp_enabled"], Value::Bool(true));
        assert!(value["session_info"]["start_time"].is_string());
        assert!(value["session_info"]["user_name"].is_null());

        let turn = &value["conversation"][0];
        assert_eq!(turn["user"], "hello");
        assert_eq!(turn["bot"], "Hello! How can I help you today?");
        assert_eq!(turn["sentiment"], "neutral");
        assert_eq!(turn["intent"], "greeting");
        assert!(turn["keywords"].is_array());

        assert_eq!(value["mood_analysis"]["trend"], "insufficient_data");
        assert_eq!(value["stats"]["message_count"], 1);
    }

    #[test]
    fn test_simple_turns_omit_analysis_fields() {
        let (_tmp, store) = setup_store();
        let mut bot = session(Variant::Simple);
        bot.respond("hello");
        let path = bot.close(&store).saved.unwrap();

        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("conversation_"), "{}", file_name);

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let turn = value["conversation"][0].as_object().unwrap();
        assert!(!turn.contains_key("sentiment"));
        assert!(!turn.contains_key("keywords"));
        assert_eq!(value["session_info"]["nlp_enabled"], Value::Bool(false));
    }

    #[test]
    fn test_repeated_saves_do_not_overwrite() {
        let (_tmp, store) = setup_store();
        let mut bot = session(Variant::Enhanced);
        bot.respond("hello");

        let first = bot.save(&store).unwrap();
        let second = bot.save(&store).unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_unwritable_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = JsonTranscriptStore::new(blocker.join("transcripts"));
        let record = session(Variant::Simple).transcript();

        let result = store.save(Variant::Simple, &record);
        assert!(matches!(result, Err(AppError::Persistence(_))));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonTranscriptStore::load(&path),
            Err(AppError::Validation(_))
        ));
    }
}
