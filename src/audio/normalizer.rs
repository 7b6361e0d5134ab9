//! Audio normalization with testable command execution.
//!
//! Uploaded call recordings arrive in arbitrary containers and channel
//! layouts; the transcription engine wants 16kHz mono WAV. Normalization
//! shells out to ffmpeg for the conversion.
//!
//! The `CommandRunner` trait enables full testability without ffmpeg installed.

use crate::defaults;
use crate::error::{CallscribeError, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
/// Enables testability by allowing mock implementations.
pub trait CommandRunner: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    /// Returns an error if the command fails or is not found.
    fn run(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command runner using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CallscribeError::ToolNotFound {
                    tool: command.to_string(),
                }
            } else {
                CallscribeError::PreprocessFailed {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CallscribeError::PreprocessFailed {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command,
                    output.status,
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Converts an input recording into the canonical mono 16kHz WAV the
/// transcription engine expects.
///
/// The normalized artifact is written next to the input with a
/// `_processed` suffix; the original upload is never touched or deleted.
pub struct AudioNormalizer<R: CommandRunner> {
    runner: R,
    ffmpeg: String,
    sample_rate: u32,
}

impl<R: CommandRunner> AudioNormalizer<R> {
    /// Create a normalizer with the given command runner.
    pub fn new(runner: R, ffmpeg: impl Into<String>, sample_rate: u32) -> Self {
        Self {
            runner,
            ffmpeg: ffmpeg.into(),
            sample_rate,
        }
    }

    /// Path the normalized artifact will be written to for a given input.
    ///
    /// `uploads/call.mp3` → `uploads/call_processed.wav`. Upload filenames
    /// are unique per job, so derived artifacts cannot collide across jobs.
    pub fn output_path(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        input.with_file_name(format!("{}{}.wav", stem, defaults::PROCESSED_SUFFIX))
    }

    /// Downmix and resample `input`, returning the path of the new file.
    ///
    /// # Errors
    /// - `ToolNotFound` when ffmpeg is not installed
    /// - `PreprocessFailed` when the input is missing or conversion exits non-zero
    /// - `PreprocessOutputMissing` when ffmpeg reports success but wrote nothing
    pub fn normalize(&self, input: &Path) -> Result<PathBuf> {
        if !input.exists() {
            return Err(CallscribeError::PreprocessFailed {
                message: format!("input audio not found: {}", input.display()),
            });
        }

        let output = Self::output_path(input);
        let input_str = input.to_string_lossy();
        let output_str = output.to_string_lossy();
        let rate = self.sample_rate.to_string();

        debug!(
            "normalizing {} -> {} ({} Hz mono)",
            input_str, output_str, rate
        );

        // "-y" overwrites a stale artifact from a previous run on the same input.
        self.runner.run(
            &self.ffmpeg,
            &[
                "-i", &input_str, "-ac", "1", "-ar", &rate, &output_str, "-y",
            ],
        )?;

        // ffmpeg can exit zero without writing output (e.g. empty input stream).
        if !output.exists() {
            return Err(CallscribeError::PreprocessOutputMissing {
                path: output_str.to_string(),
            });
        }

        info!("normalized audio written to {}", output_str);
        Ok(output)
    }
}

impl AudioNormalizer<SystemCommandRunner> {
    /// Create a normalizer with the system command runner and defaults.
    pub fn system(ffmpeg: impl Into<String>, sample_rate: u32) -> Self {
        Self::new(SystemCommandRunner::new(), ffmpeg, sample_rate)
    }
}
