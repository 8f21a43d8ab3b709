pub mod app;
pub mod audio;
pub mod config;
pub mod controller;
pub mod dirs;
pub mod engine;
pub mod models;
pub mod output;
pub mod segment;
pub mod transcribe;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Application-specific environment variable for log filtering (overrides config).
const LOG_ENV_VAR: &str = "MICSCRIBE_LOG";

/// Entry point: configures logging and runs the pipeline.
pub async fn run(config: config::Config) -> anyhow::Result<()> {
    // Logs go to stderr so transcripts on stdout stay clean.
    // MICSCRIBE_LOG env var overrides the config file level.
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(config.logging.level.as_directive().parse()?)
        .from_env()?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Route whisper.cpp and GGML logs through tracing
    whisper_rs::install_logging_hooks();

    app::run(config).await
}
