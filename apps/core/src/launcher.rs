//! Menu for picking and running chatbots one after another.

use std::io::Write;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::AppConfig;
use crate::console::{run_session, LineSource};
use crate::error::AppError;
use crate::profile::{Profile, Variant};
use crate::responses::{RandomPicker, TemplatePicker};
use crate::session::ChatSession;
use crate::transcript::TranscriptStore;

/// A menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Run(Variant),
    Exit,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Choice::Run(Variant::Simple)),
            "2" => Some(Choice::Run(Variant::Enhanced)),
            "3" => Some(Choice::Run(Variant::Nlp)),
            "0" => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Reply to "try another chatbot?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
}

impl Answer {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Answer::Yes),
            "n" | "no" => Some(Answer::No),
            _ => None,
        }
    }
}

fn write_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\n🤖 Choose your chatbot:")?;
    writeln!(out, "   1. Simple ChatBot (basic pattern matching)")?;
    writeln!(out, "   2. Enhanced ChatBot (remembers your name and conversation)")?;
    writeln!(out, "   3. NLP ChatBot (sentiment and emotion aware)")?;
    writeln!(out, "   0. Exit")?;
    write!(out, "Enter your choice (0-3): ")?;
    out.flush()
}

/// Build and run one session of the given variant.
pub async fn launch<W: Write>(
    variant: Variant,
    config: &AppConfig,
    picker: Box<dyn TemplatePicker>,
    lines: &mut LineSource,
    interrupts: &mut mpsc::Receiver<()>,
    out: &mut W,
    store: &dyn TranscriptStore,
) -> Result<(), AppError> {
    let profile = Profile::build(variant)?;
    let mut session = ChatSession::new(profile, config.session_options(), picker);
    run_session(&mut session, lines, interrupts, out, store).await
}

/// Offer the menu until the user exits, input ends, or Ctrl-C.
pub async fn run_menu<W: Write>(
    config: &AppConfig,
    lines: &mut LineSource,
    interrupts: &mut mpsc::Receiver<()>,
    out: &mut W,
    store: &dyn TranscriptStore,
) -> Result<(), AppError> {
    loop {
        write_menu(out)?;

        let choice = loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                Some(()) = interrupts.recv() => None,
            };
            let Some(line) = line else {
                writeln!(out)?;
                return Ok(());
            };
            match Choice::parse(&line) {
                Some(choice) => break choice,
                None => {
                    write!(out, "Invalid choice. Please enter 0, 1, 2 or 3: ")?;
                    out.flush()?;
                }
            }
        };

        let variant = match choice {
            Choice::Exit => break,
            Choice::Run(variant) => variant,
        };

        info!(%variant, "Launching chatbot");
        launch(
            variant,
            config,
            Box::new(RandomPicker::new()),
            lines,
            interrupts,
            out,
            store,
        )
        .await?;

        write!(out, "\nWould you like to try another chatbot? (y/n): ")?;
        out.flush()?;
        let answer = loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                Some(()) = interrupts.recv() => None,
            };
            // End of input or Ctrl-C counts as no
            let Some(line) = line else { break Answer::No };
            match Answer::parse(&line) {
                Some(answer) => break answer,
                None => {
                    write!(out, "Please enter 'y' for yes or 'n' for no. (y/n): ")?;
                    out.flush()?;
                }
            }
        };
        if answer == Answer::No {
            break;
        }
    }

    writeln!(out, "👋 Thanks for trying the chatbots!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parse() {
        assert_eq!(Choice::parse("1"), Some(Choice::Run(Variant::Simple)));
        assert_eq!(Choice::parse(" 3 "), Some(Choice::Run(Variant::Nlp)));
        assert_eq!(Choice::parse("0"), Some(Choice::Exit));
        assert_eq!(Choice::parse("4"), None);
        assert_eq!(Choice::parse("nlp"), None);
    }

    #[test]
    fn test_answer_parse() {
        assert_eq!(Answer::parse("Y"), Some(Answer::Yes));
        assert_eq!(Answer::parse(" yes "), Some(Answer::Yes));
        assert_eq!(Answer::parse("n"), Some(Answer::No));
        assert_eq!(Answer::parse("NO"), Some(Answer::No));
        assert_eq!(Answer::parse("yellow"), None);
        assert_eq!(Answer::parse("nope"), None);
        assert_eq!(Answer::parse(""), None);
    }
}
