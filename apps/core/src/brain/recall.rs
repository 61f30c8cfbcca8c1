//! Memory recall: find earlier user messages related to a query.

use crate::conversation::Turn;

/// Phrase used when nothing in the window relates to the query.
pub const RECALL_FALLBACK: &str = "something we discussed earlier";

/// Turns scanned by default, most recent last.
pub const DEFAULT_WINDOW: usize = 10;
/// Quoted turns returned by default.
pub const DEFAULT_LIMIT: usize = 2;

/// Quote up to `limit` of the last `window` user messages that share a word
/// with the query, oldest first.
///
/// A turn is relevant when any lower-cased query word is a substring of its
/// lower-cased user text.
pub fn search_context(query: &str, history: &[Turn], window: usize, limit: usize) -> String {
    let query_words: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let recent = &history[history.len().saturating_sub(window)..];
    let quotes: Vec<String> = recent
        .iter()
        .filter(|turn| {
            let user_text = turn.user_text.to_lowercase();
            query_words.iter().any(|word| user_text.contains(word.as_str()))
        })
        .take(limit)
        .map(|turn| format!("You said: '{}'", turn.user_text))
        .collect();

    if quotes.is_empty() {
        RECALL_FALLBACK.to_string()
    } else {
        quotes.join(" ")
    }
}
