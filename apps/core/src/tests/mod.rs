//! Test Module
//!
//! Cross-module tests for the chatbots.
//!
//! ## Test Categories
//! - `brain_tests`: rule tables, sentiment labels, emotions, keywords and names
//! - `session_tests`: turn resolution and the session lifecycle for each variant
//! - `persistence_tests`: transcript files on disk
//! - `config_tests`: environment parsing and validation
//! - `console_tests`: the interactive loop driven by scripted input

pub mod persistence_tests;
pub mod session_tests;
