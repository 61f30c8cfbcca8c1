//! Transcript persistence.
//!
//! A closing session hands over a [`TranscriptRecord`]; where and how it is
//! written is up to the [`TranscriptStore`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::conversation::{MoodSummary, Turn};
use crate::error::AppError;
use crate::profile::Variant;
use crate::session::SessionStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub user_name: Option<String>,
    pub nlp_enabled: bool,
}

/// Everything persisted about one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub session_info: SessionInfo,
    pub conversation: Vec<Turn>,
    pub mood_analysis: MoodSummary,
    pub stats: SessionStats,
}

/// Destination for finished transcripts.
pub trait TranscriptStore {
    /// Persist a record, returning where it went.
    fn save(&self, variant: Variant, record: &TranscriptRecord) -> Result<PathBuf, AppError>;
}

/// Writes each transcript as a pretty-printed JSON file.
pub struct JsonTranscriptStore {
    dir: PathBuf,
}

impl JsonTranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// `<prefix>_<YYYYmmdd_HHMMSS>.json`, with a counter appended when a file
    /// of that name already exists.
    fn target_path(&self, variant: Variant, at: DateTime<Local>) -> PathBuf {
        let stem = format!("{}_{}", variant.transcript_prefix(), at.format("%Y%m%d_%H%M%S"));
        let mut path = self.dir.join(format!("{}.json", stem));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}_{}.json", stem, n));
            n += 1;
        }
        path
    }

    /// Read a transcript back.
    #[cfg(test)]
    pub fn load(path: &std::path::Path) -> Result<TranscriptRecord, AppError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl TranscriptStore for JsonTranscriptStore {
    fn save(&self, variant: Variant, record: &TranscriptRecord) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::Persistence(format!(
                "Cannot create transcript directory {:?}: {}",
                self.dir, e
            ))
        })?;

        let json = serde_json::to_string_pretty(record)?;
        let path = self.target_path(variant, record.session_info.end_time);

        fs::write(&path, json)
            .map_err(|e| AppError::Persistence(format!("Cannot write {:?}: {}", path, e)))?;

        debug!(path = %path.display(), turns = record.conversation.len(), "Transcript written");
        Ok(path)
    }
}
