//! Model download and management.
//!
//! Handles automatic downloading of Whisper GGML models on first run.

use anyhow::{Context, Result};
use clap::ValueEnum;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

const WHISPER_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Whisper model size, fixed per process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    /// ~75MB, fastest, least accurate.
    Tiny,
    /// ~150MB, good latency/accuracy balance.
    #[default]
    Base,
    /// ~500MB.
    Small,
    /// ~1.5GB.
    Medium,
    /// ~3GB (large-v3), most accurate.
    Large,
}

impl ModelSize {
    /// Get model metadata.
    fn info(&self) -> ModelInfo {
        match self {
            ModelSize::Tiny => ModelInfo {
                filename: "ggml-tiny.bin",
                url: format!("{}/ggml-tiny.bin", WHISPER_BASE_URL),
                size_bytes: Some(77_691_713),
            },
            ModelSize::Base => ModelInfo {
                filename: "ggml-base.bin",
                url: format!("{}/ggml-base.bin", WHISPER_BASE_URL),
                size_bytes: Some(147_951_465),
            },
            ModelSize::Small => ModelInfo {
                filename: "ggml-small.bin",
                url: format!("{}/ggml-small.bin", WHISPER_BASE_URL),
                size_bytes: Some(487_601_967),
            },
            ModelSize::Medium => ModelInfo {
                filename: "ggml-medium.bin",
                url: format!("{}/ggml-medium.bin", WHISPER_BASE_URL),
                size_bytes: Some(1_533_774_781),
            },
            ModelSize::Large => ModelInfo {
                filename: "ggml-large-v3.bin",
                url: format!("{}/ggml-large-v3.bin", WHISPER_BASE_URL),
                size_bytes: Some(3_094_623_691),
            },
        }
    }
}

/// Metadata for a downloadable model.
struct ModelInfo {
    /// Filename to save as.
    filename: &'static str,
    /// Download URL.
    url: String,
    /// Expected file size for validation (optional).
    size_bytes: Option<u64>,
}

/// Manages model downloads and storage.
pub struct ModelManager {
    models_dir: PathBuf,
}

impl ModelManager {
    /// Create a new ModelManager using the default models directory.
    ///
    /// Default: `~/.local/share/micscribe/models/`
    pub fn new() -> Result<Self> {
        let models_dir = crate::dirs::data_dir()?.join("models");
        Ok(Self { models_dir })
    }

    /// Create a ModelManager with a custom models directory.
    pub fn with_dir(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Get the models directory path.
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Ensure a model is available, downloading if necessary.
    ///
    /// `on_progress` is called with (downloaded_bytes, total_bytes) while a
    /// download is in flight. Returns the path to the model file.
    pub async fn ensure_model(
        &self,
        model: ModelSize,
        on_progress: impl Fn(u64, u64),
    ) -> Result<PathBuf> {
        let info = model.info();
        let model_path = self.models_dir.join(info.filename);

        if model_path.exists() {
            // Validate size if known
            if let Some(expected_size) = info.size_bytes {
                let metadata = fs::metadata(&model_path)
                    .await
                    .context("Failed to read model metadata")?;
                let actual_size = metadata.len();

                if actual_size != expected_size {
                    warn!(
                        model = ?model,
                        expected = expected_size,
                        actual = actual_size,
                        "Model size mismatch, re-downloading"
                    );
                    fs::remove_file(&model_path)
                        .await
                        .context("Failed to remove corrupted model")?;
                } else {
                    debug!(path = %model_path.display(), "Model already exists");
                    return Ok(model_path);
                }
            } else {
                debug!(path = %model_path.display(), "Model already exists");
                return Ok(model_path);
            }
        }

        self.download_model(&info, &model_path, on_progress).await?;
        Ok(model_path)
    }

    /// Download a model from its URL, streaming to a temporary file.
    async fn download_model(
        &self,
        info: &ModelInfo,
        dest: &Path,
        on_progress: impl Fn(u64, u64),
    ) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create models directory")?;
        }

        info!(
            url = %info.url,
            dest = %dest.display(),
            "Downloading model"
        );

        let response = reqwest::get(&info.url)
            .await
            .with_context(|| format!("Failed to download model from {}", info.url))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to download model: HTTP {}", response.status());
        }

        let total = response
            .content_length()
            .or(info.size_bytes)
            .unwrap_or(0);

        // Write to temporary file first, then rename (atomic)
        let temp_path = dest.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .await
            .context("Failed to create temporary model file")?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read download stream")?;
            file.write_all(&chunk)
                .await
                .context("Failed to write model file")?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, total);
        }
        file.sync_all().await.context("Failed to sync model file")?;
        drop(file);

        if let Some(expected) = info.size_bytes
            && downloaded != expected
        {
            let _ = fs::remove_file(&temp_path).await;
            anyhow::bail!(
                "Downloaded model size mismatch: expected {}, got {}",
                expected,
                downloaded
            );
        }

        fs::rename(&temp_path, dest)
            .await
            .context("Failed to finalize model file")?;

        info!(
            path = %dest.display(),
            size = downloaded,
            "Model downloaded successfully"
        );

        Ok(())
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
