//! Configuration management.
//!
//! Handles loading, saving, and providing defaults for the configuration.
//! All values are fixed at process start; there is no runtime reconfiguration.

use crate::models::ModelSize;
use crate::output::Destination;
use crate::segment::SegmenterConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub audio: AudioConfig,
    pub segmenter: SegmenterConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Configuration for the speech recognition model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Whisper model size to use.
    pub size: ModelSize,
    /// Language to recognize. Use "auto" for automatic detection.
    pub language: String,
}

/// Audio capture configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Requested frames per device callback.
    pub buffer_size: u32,
    /// Capacity of the callback-to-consumer queue, in callbacks. Audio beyond
    /// this arriving while a transcription is in flight is dropped.
    pub queue_frames: usize,
}

/// Output delivery configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where transcribed text goes.
    pub destination: Destination,
    /// Wait for Enter before the first segment is captured.
    pub wait_for_enter: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: LogLevel,
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to a tracing filter directive string for this crate.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "micscribe=error",
            LogLevel::Warn => "micscribe=warn",
            LogLevel::Info => "micscribe=info",
            LogLevel::Debug => "micscribe=debug",
            LogLevel::Trace => "micscribe=trace",
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            size: ModelSize::default(),
            language: "auto".to_string(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1024,
            queue_frames: 64,
        }
    }
}

impl Config {
    /// Returns the default config directory path.
    /// `~/.config/micscribe/` (or `$XDG_CONFIG_HOME/micscribe/`)
    pub fn config_dir() -> Result<PathBuf> {
        crate::dirs::config_dir()
    }

    /// Returns the default config file path.
    /// `~/.config/micscribe/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load configuration from the default path.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file as TOML")
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
