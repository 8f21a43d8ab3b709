use anyhow::Result;
use clap::Parser;
use micscribe::config::Config;
use micscribe::models::ModelSize;
use micscribe::output::Destination;
use std::path::PathBuf;

/// Microphone dictation: silence-segmented Whisper transcription delivered
/// to the console or the clipboard.
#[derive(Debug, Parser)]
#[command(name = "micscribe", version, about)]
struct Cli {
    /// Path to the config file (default: ~/.config/micscribe/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Whisper model size
    #[arg(long, value_enum)]
    model: Option<ModelSize>,

    /// Where transcribed text is delivered
    #[arg(long, value_enum)]
    output: Option<Destination>,

    /// Language code (e.g. "en"), or "auto" to detect
    #[arg(long)]
    language: Option<String>,

    /// Wait for Enter before listening starts
    #[arg(long)]
    wait_for_enter: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_default(),
    };

    if let Some(model) = cli.model {
        config.model.size = model;
    }
    if let Some(output) = cli.output {
        config.output.destination = output;
    }
    if let Some(language) = cli.language {
        config.model.language = language;
    }
    if cli.wait_for_enter {
        config.output.wait_for_enter = true;
    }

    micscribe::run(config).await
}
