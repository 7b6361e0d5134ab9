//! Model download and installation management.
//!
//! Handles downloading Whisper models from HuggingFace, verifying their
//! integrity, and storing them in the user's cache directory.

use crate::error::{CallscribeError, Result};
use crate::models::catalog::{ModelInfo, get_model};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the directory where models are stored.
///
/// Uses `~/.cache/callscribe/models/` on Linux/Unix.
pub fn models_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("callscribe")
        .join("models")
}

/// Get the full path for a model file.
///
/// Always returns a path regardless of whether the model is in the catalog.
/// The file may or may not exist on disk.
pub fn model_path(name: &str) -> PathBuf {
    models_dir().join(format!("ggml-{}.bin", name.trim()))
}

/// Check if a model is installed.
pub fn is_model_installed(name: &str) -> bool {
    model_path(name).exists()
}

/// Human-readable one-line description of a catalog entry.
pub fn format_model_info(model: &ModelInfo) -> String {
    let installed = if is_model_installed(model.name) {
        " [installed]"
    } else {
        ""
    };
    let scope = if model.english_only {
        "English only"
    } else {
        "multilingual"
    };
    format!(
        "{:<10} {:>5} MB  {}{}",
        model.name, model.size_mb, scope, installed
    )
}

/// Download a Whisper model into the cache directory.
///
/// No-op if the model is already installed. With `progress`, renders a
/// download bar on stderr.
pub async fn download_model(name: &str, progress: bool) -> Result<PathBuf> {
    let model = get_model(name).ok_or_else(|| {
        CallscribeError::Other(format!(
            "Unknown model '{}'. See `callscribe models list`.",
            name
        ))
    })?;

    let output_path = model_path(model.name);
    if output_path.exists() {
        return Ok(output_path);
    }

    download_to_path(model, &output_path, progress).await?;
    Ok(output_path)
}

/// Core download: fetch url, save to path, verify sha1 if pinned.
async fn download_to_path(model: &ModelInfo, output_path: &Path, progress: bool) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CallscribeError::Other(format!("Failed to create models directory: {e}")))?;
    }

    if progress {
        eprintln!("Downloading {} ({} MB)...", model.name, model.size_mb);
    }

    let client = reqwest::Client::new();
    let response = client
        .get(model.url)
        .send()
        .await
        .map_err(|e| CallscribeError::Other(format!("Failed to start download: {e}")))?;

    if !response.status().is_success() {
        return Err(CallscribeError::Other(format!(
            "Download failed with status: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);

    let pb = if progress {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            // SAFETY: hardcoded template string — always valid
            #[allow(clippy::expect_used)]
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    // Download with streaming and hash calculation
    let mut hasher = Sha1::new();
    let mut stream = response.bytes_stream();
    let mut file = fs::File::create(output_path)
        .map_err(|e| CallscribeError::Other(format!("Failed to create output file: {e}")))?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| CallscribeError::Other(format!("Failed to read download chunk: {e}")))?;

        std::io::Write::write_all(&mut file, &chunk)
            .map_err(|e| CallscribeError::Other(format!("Failed to write to file: {e}")))?;

        hasher.update(&chunk);

        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Downloaded");
    }

    // Verify SHA-1 checksum
    if !model.sha1.is_empty() {
        let calculated_hash = format!("{:x}", hasher.finalize());
        if calculated_hash != model.sha1 {
            if let Err(e) = fs::remove_file(output_path) {
                warn!("failed to remove corrupted download: {e}");
            }
            return Err(CallscribeError::Other(format!(
                "SHA-1 checksum mismatch. Expected: {}, got: {}",
                model.sha1, calculated_hash
            )));
        }
        if progress {
            eprintln!("Checksum verified");
        }
    }

    if progress {
        eprintln!("Model installed to: {}", output_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::list_models;

    #[test]
    fn test_models_dir_under_callscribe_cache() {
        let dir = models_dir();
        assert!(dir.to_string_lossy().contains("callscribe"));
        assert!(dir.ends_with("callscribe/models") || dir.ends_with("models"));
    }

    #[test]
    fn test_model_path_uses_ggml_naming() {
        let path = model_path("base");
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "ggml-base.bin"
        );
    }

    #[test]
    fn test_model_path_trims_whitespace() {
        assert_eq!(model_path(" base "), model_path("base"));
    }

    #[test]
    fn test_format_model_info_lists_scope() {
        let base = get_model("base").unwrap();
        assert!(format_model_info(base).contains("multilingual"));

        let base_en = get_model("base.en").unwrap();
        assert!(format_model_info(base_en).contains("English only"));
    }

    #[tokio::test]
    async fn test_download_unknown_model_fails() {
        let result = download_model("no-such-model", false).await;
        match result {
            Err(CallscribeError::Other(message)) => {
                assert!(message.contains("Unknown model"));
            }
            _ => panic!("Expected Other error for unknown model"),
        }
    }

    #[test]
    fn test_catalog_checksums_are_pinned() {
        for model in list_models() {
            assert_eq!(model.sha1.len(), 40, "unpinned checksum for {}", model.name);
        }
    }
}
