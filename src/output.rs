//! Delivery of transcribed text to its destination.
//!
//! Text goes either to stdout or to the system clipboard. Delivery failure is
//! never fatal: a clipboard error falls back to the console and is logged.

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where transcribed text is delivered, fixed per process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Print to stdout.
    #[default]
    Console,
    /// Copy to the system clipboard.
    Clipboard,
}

/// Delivers transcribed text to the configured destination.
pub struct OutputSink {
    destination: Destination,
}

impl OutputSink {
    /// Create a sink for the given destination.
    pub fn new(destination: Destination) -> Self {
        Self { destination }
    }

    /// Get the configured destination.
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Deliver one piece of text.
    ///
    /// Clipboard failures are logged and the text is printed to the console
    /// instead, so no transcription is silently lost.
    pub fn deliver(&mut self, text: &str) -> Result<()> {
        match self.destination {
            Destination::Console => {
                println!("{text}");
            }
            Destination::Clipboard => match copy_to_clipboard(text) {
                Ok(()) => {
                    debug!(chars = text.chars().count(), "Copied text to clipboard");
                }
                Err(e) => {
                    warn!(error = %e, "Clipboard unavailable, falling back to console");
                    println!("{text}");
                }
            },
        }
        Ok(())
    }
}

/// Put text on the system clipboard.
///
/// The clipboard handle is opened per delivery; holding it for the process
/// lifetime keeps a display-server connection open for no benefit between
/// utterances.
fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| anyhow::anyhow!("Clipboard init failed: {}", e))?;
    clipboard
        .set_text(text)
        .map_err(|e| anyhow::anyhow!("Clipboard set failed: {}", e))?;
    Ok(())
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
