//! Whisper-based speech-to-text transcription.
//!
//! This module provides a Whisper implementation of the Transcriber trait using whisper-rs.
//!
//! # Feature Gate
//!
//! This module requires the `whisper` feature to be enabled and cmake to be installed.
//! To build with Whisper support:
//!
//! ```bash
//! cargo build --features whisper
//! ```

use crate::defaults;
use crate::error::{CallscribeError, Result};
use crate::stt::transcriber::{Transcriber, Transcript};
use std::path::{Path, PathBuf};

#[cfg(feature = "whisper")]
use std::sync::{Mutex, Once};
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,
    /// Spoken language of the calls (e.g. "hi", "en")
    pub language: String,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.bin"),
            language: defaults::DEFAULT_SOURCE_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

/// Whisper-based transcriber implementation.
///
/// The model is loaded once at startup and the handle shared across jobs;
/// the WhisperContext is wrapped in a Mutex to ensure thread safety.
///
/// # Feature Gate
///
/// This type is only available when the `whisper` feature is enabled.
#[cfg(feature = "whisper")]
pub struct WhisperTranscriber {
    context: Mutex<WhisperContext>,
    config: WhisperConfig,
    model_name: String,
}

#[cfg(feature = "whisper")]
impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("config", &self.config)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

/// Whisper-based transcriber placeholder (without whisper feature).
///
/// This is a stub implementation that returns errors when used.
/// Enable the `whisper` feature to use real transcription.
#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperTranscriber {
    config: WhisperConfig,
    model_name: String,
}

fn model_name_of(config: &WhisperConfig) -> String {
    config
        .model_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Read a normalized WAV file into f32 samples in [-1.0, 1.0].
///
/// The normalizer guarantees 16kHz mono output; anything else reaching this
/// point is a bug upstream, reported as a format mismatch rather than fed
/// to the model.
pub fn read_normalized_wav(path: &Path) -> Result<Vec<f32>> {
    let reader = hound::WavReader::open(path).map_err(|e| {
        CallscribeError::transcription(format!("failed to open WAV {}: {}", path.display(), e))
    })?;

    let spec = reader.spec();
    if spec.channels != defaults::CHANNELS || spec.sample_rate != defaults::SAMPLE_RATE {
        return Err(CallscribeError::AudioFormatMismatch {
            expected: format!("{}Hz mono", defaults::SAMPLE_RATE),
            actual: format!("{}Hz {}ch", spec.sample_rate, spec.channels),
        });
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                CallscribeError::transcription(format!("failed to read WAV samples: {}", e))
            })?
            .into_iter()
            .map(|sample| sample as f32 / 32768.0)
            .collect(),
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                CallscribeError::transcription(format!("failed to read WAV samples: {}", e))
            })?,
    };

    Ok(samples)
}

#[cfg(feature = "whisper")]
impl WhisperTranscriber {
    /// Create a new Whisper transcriber.
    ///
    /// # Errors
    /// Returns `CallscribeError::ModelNotFound` if the model file doesn't exist
    /// Returns `CallscribeError::EngineUnavailable` if model loading fails
    pub fn new(config: WhisperConfig) -> Result<Self> {
        // Install logging hooks to suppress whisper.cpp output (only once)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(CallscribeError::ModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_of(&config);

        let mut context_params = WhisperContextParameters::default();
        // Fused attention kernels avoid the standalone softmax CUDA kernel,
        // which crashes on Blackwell GPUs (sm_120) with ggml <= 1.7.6
        context_params.flash_attn(true);
        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| CallscribeError::transcription("Invalid UTF-8 in model path"))?,
            context_params,
        )
        .map_err(|e| {
            CallscribeError::transcription(format!("Failed to load Whisper model: {}", e))
        })?;

        Ok(Self {
            context: Mutex::new(context),
            config,
            model_name,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

#[cfg(not(feature = "whisper"))]
impl WhisperTranscriber {
    /// Create a new Whisper transcriber (stub implementation).
    pub fn new(config: WhisperConfig) -> Result<Self> {
        if !config.model_path.exists() {
            return Err(CallscribeError::ModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_of(&config);
        Ok(Self { config, model_name })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

#[cfg(feature = "whisper")]
impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let audio = read_normalized_wav(audio_path)?;

        let context = self
            .context
            .lock()
            .map_err(|e| CallscribeError::transcription(format!("context lock poisoned: {}", e)))?;

        let mut state = context.create_state().map_err(|e| {
            CallscribeError::transcription(format!("Failed to create Whisper state: {}", e))
        })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.config.language));
        params.set_translate(false);

        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }

        // Disable printing to stdout/stderr
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state.full(params, &audio).map_err(|e| {
            CallscribeError::transcription(format!("Whisper inference failed: {}", e))
        })?;

        // Prefer the language the model actually detected over the configured one
        let lang_id = state.full_lang_id_from_state();
        let language = match whisper_rs::get_lang_str(lang_id) {
            Some(lang) if !lang.is_empty() => lang.to_string(),
            _ => self.config.language.clone(),
        };

        let mut text = String::new();
        for segment in state.as_iter() {
            text.push_str(&segment.to_string());
        }

        Ok(Transcript::new(text.trim().to_string(), language))
    }

    fn engine_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(not(feature = "whisper"))]
impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, _audio_path: &Path) -> Result<Transcript> {
        Err(CallscribeError::transcription(concat!(
            "Whisper feature not enabled. This binary was built without speech recognition.\n",
            "To fix: cargo build --release (whisper is enabled by default)\n",
            "If build fails with cmake errors, install: sudo apt install cmake"
        )))
    }

    fn engine_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        false
    }
}
