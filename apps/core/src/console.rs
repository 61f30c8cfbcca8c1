//! Interactive console loop around a [`ChatSession`].
//!
//! Stdin is read on a dedicated thread and forwarded over a channel so the
//! loop can wait on input and Ctrl-C at the same time.

use std::any::Any;
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::brain::Sentiment;
use crate::error::AppError;
use crate::session::{ChatSession, SessionStats, TurnOutcome};
use crate::transcript::TranscriptStore;

/// Lines of user input.
pub struct LineSource {
    rx: mpsc::Receiver<String>,
}

impl LineSource {
    /// Read lines from stdin until EOF.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel(16);
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }

    /// A fixed script of lines, then EOF.
    #[cfg(test)]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let (tx, rx) = mpsc::channel(lines.len().max(1));
        for line in lines {
            // Capacity covers every line
            let _ = tx.try_send(line);
        }
        Self { rx }
    }

    /// Next line, or `None` at end of input.
    pub async fn next_line(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Forward Ctrl-C presses into a channel.
pub fn listen_for_interrupts() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C: {}", e);
                break;
            }
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });
    rx
}

/// What the user typed, once console commands are separated from chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input<'a> {
    Stats,
    Mood,
    Save,
    Chat(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str, mood_available: bool) -> Self {
        match line.to_lowercase().as_str() {
            "stats" => Input::Stats,
            "mood" if mood_available => Input::Mood,
            "save" => Input::Save,
            _ => Input::Chat(line),
        }
    }
}

fn mood_marker(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "😊",
        Sentiment::Neutral => "😐",
        Sentiment::Negative => "😔",
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure".to_string()
    }
}

pub fn write_stats<W: Write>(out: &mut W, stats: &SessionStats) -> io::Result<()> {
    writeln!(out, "📊 Session Stats:")?;
    writeln!(out, "   Duration: {}", stats.duration)?;
    writeln!(out, "   Messages: {}", stats.message_count)?;
    writeln!(out, "   Your name: {}", stats.user_name)?;
    writeln!(
        out,
        "   NLP Features: {}",
        if stats.nlp_enabled { "Active" } else { "Inactive" }
    )?;
    writeln!(out, "   Average Mood: {}", stats.average_mood)?;
    writeln!(out, "   Mood Trend: {}", stats.mood_trend.label())?;
    writeln!(out, "   Unique Keywords: {}", stats.unique_keyword_count)
}

fn write_banner<W: Write>(out: &mut W, session: &ChatSession) -> io::Result<()> {
    let bot = session.variant().bot_name();
    writeln!(out, "🤖 {}: Hello! Type 'quit' or 'bye' to exit, 'stats' for statistics.", bot)?;
    if session.mood_summary().is_some() {
        let status = if session.nlp_enabled() { "Enabled" } else { "Disabled" };
        writeln!(out, "   🧠 Natural Language Processing: {}", status)?;
        writeln!(out, "   Type 'mood' for a mood analysis.")?;
    }
    writeln!(out, "{}", "=".repeat(60))
}

/// Drive a session until the user leaves, input ends, or Ctrl-C; then save
/// the transcript and print final stats.
pub async fn run_session<W: Write>(
    session: &mut ChatSession,
    lines: &mut LineSource,
    interrupts: &mut mpsc::Receiver<()>,
    out: &mut W,
    store: &dyn TranscriptStore,
) -> Result<(), AppError> {
    let bot = session.variant().bot_name();
    write_banner(out, session)?;

    loop {
        write!(out, "👤 You: ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line,
            Some(()) = interrupts.recv() => None,
        };

        let Some(line) = line else {
            writeln!(out, "\n🤖 {}: {}", bot, session.interrupt())?;
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let text = match Input::parse(line, session.mood_summary().is_some()) {
            Input::Stats => {
                write_stats(out, &session.stats())?;
                continue;
            }
            Input::Mood => {
                if let Some(mood) = session.mood_summary() {
                    writeln!(out, "🎭 Mood Analysis:")?;
                    writeln!(out, "   Overall Sentiment: {}", mood.average_sentiment)?;
                    writeln!(out, "   Mood Trend: {}", mood.trend.label())?;
                    writeln!(out, "   Sentiment Score: {:.3}", mood.average_score)?;
                }
                continue;
            }
            Input::Save => {
                match session.save(store) {
                    Ok(path) => writeln!(out, "💾 Conversation saved to: {}", path.display())?,
                    Err(e) => writeln!(out, "Error saving conversation: {}", e)?,
                }
                continue;
            }
            Input::Chat(text) => text,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| session.respond(text)));
        match outcome {
            Ok(TurnOutcome::Ignored) => {}
            Ok(TurnOutcome::Reply(reply)) => {
                let marker = match reply.sentiment {
                    Some(sentiment) if session.nlp_enabled() => {
                        format!(" {}", mood_marker(sentiment))
                    }
                    _ => String::new(),
                };
                writeln!(out, "🤖 {}: {}{}", bot, reply.text, marker)?;
            }
            Ok(TurnOutcome::Farewell(text)) => {
                writeln!(out, "🤖 {}: {}", bot, text)?;
                break;
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Turn failed: {}", message);
                writeln!(out, "🤖 {}: Sorry, I encountered an error: {}", bot, message)?;
            }
        }
    }

    let report = session.close(store);
    match &report.saved {
        Ok(path) => writeln!(out, "💾 Conversation saved to: {}", path.display())?,
        Err(e) => writeln!(out, "Error saving conversation: {}", e)?,
    }
    writeln!(
        out,
        "📊 Final Stats: {} messages in {}, {} mood",
        report.stats.message_count, report.stats.duration, report.stats.average_mood
    )?;

    Ok(())
}
