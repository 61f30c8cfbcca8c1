// Chatbots entry point
// Pick a bot from the menu, or run one directly with --bot.

mod brain;
mod config;
mod console;
mod conversation;
mod error;
mod fs_manager;
mod launcher;
mod logging;
mod profile;
mod responses;
mod session;
mod transcript;

#[cfg(test)]
mod tests;

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

use config::{AppConfig, LogFormat};
use console::{listen_for_interrupts, LineSource};
use fs_manager::PortablePathManager;
use profile::Variant;
use responses::RandomPicker;
use transcript::JsonTranscriptStore;

#[derive(Debug, Parser)]
#[command(name = "chatbots", version, about = "Rule-based console chatbots")]
struct Cli {
    /// Run this chatbot directly instead of showing the menu
    #[arg(long, value_enum)]
    bot: Option<Variant>,

    /// Directory for saved transcripts and other data
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Run the NLP chatbot without its sentiment and keyword engines
    #[arg(long)]
    no_nlp: bool,

    /// Log output style (logs go to stderr)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Invalid configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if cli.no_nlp {
        config.nlp_enabled = false;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    logging::init(config.log_format).context("Failed to initialise logging")?;
    info!(?config, "Configuration loaded");

    let paths = PortablePathManager::new(config.data_dir.clone());
    if let Err(e) = paths.init() {
        // Saving will fail later and be reported per session
        warn!("Could not prepare data directory {:?}: {}", paths.data_dir(), e);
    }
    let store = JsonTranscriptStore::new(paths.transcripts_dir());

    let mut lines = LineSource::stdin();
    let mut interrupts = listen_for_interrupts();
    let mut out = io::stdout();

    match cli.bot {
        Some(variant) => {
            launcher::launch(
                variant,
                &config,
                Box::new(RandomPicker::new()),
                &mut lines,
                &mut interrupts,
                &mut out,
                &store,
            )
            .await?
        }
        None => launcher::run_menu(&config, &mut lines, &mut interrupts, &mut out, &store).await?,
    }

    info!("Shutting down");
    Ok(())
}
