//! Application configuration.
//!
//! Values come from the environment (a `.env` file is honoured) and may be
//! overridden on the command line before validation.

use clap::ValueEnum;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

use crate::brain::recall;
use crate::error::AppError;
use crate::session::SessionOptions;

pub const ENV_DATA_DIR: &str = "CHATBOT_DATA_DIR";
pub const ENV_NLP: &str = "CHATBOT_NLP";
pub const ENV_CONTEXT_WINDOW: &str = "CHATBOT_CONTEXT_WINDOW";
pub const ENV_RECALL_LIMIT: &str = "CHATBOT_RECALL_LIMIT";
pub const ENV_LOG_FORMAT: &str = "CHATBOT_LOG_FORMAT";

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// Bunyan-style JSON
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "{} must be 'pretty' or 'json', got {:?}",
                ENV_LOG_FORMAT, other
            ))),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    /// Root of the data directory; transcripts go in `<data_dir>/transcripts`.
    pub data_dir: PathBuf,
    /// Whether the NLP variant gets a real sentiment/keyword engine.
    pub nlp_enabled: bool,
    #[validate(range(min = 1, max = 100))]
    pub context_window: usize,
    #[validate(range(min = 1, max = 10))]
    pub recall_limit: usize,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            nlp_enabled: true,
            context_window: recall::DEFAULT_WINDOW,
            recall_limit: recall::DEFAULT_LIMIT,
            log_format: LogFormat::default(),
        }
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(AppError::Config(format!(
            "{} must be on/off, got {:?}",
            var, other
        ))),
    }
}

fn parse_usize(var: &str, raw: &str) -> Result<usize, AppError> {
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{} must be a positive integer: {}", var, e)))
}

impl AppConfig {
    /// Load `.env` if present, then read the environment.
    pub fn load() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Read the environment, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Ok(dir) = env::var(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(raw) = env::var(ENV_NLP) {
            config.nlp_enabled = parse_bool(ENV_NLP, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_CONTEXT_WINDOW) {
            config.context_window = parse_usize(ENV_CONTEXT_WINDOW, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_RECALL_LIMIT) {
            config.recall_limit = parse_usize(ENV_RECALL_LIMIT, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_LOG_FORMAT) {
            config.log_format = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            nlp_enabled: self.nlp_enabled,
            context_window: self.context_window,
            recall_limit: self.recall_limit,
        }
    }
}
