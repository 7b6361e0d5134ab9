//! Default configuration constants for callscribe.
//!
//! Shared constants used across configuration types and the pipeline,
//! kept in one place to avoid drift between modules.

/// Sample rate the transcription engine expects, in Hz.
///
/// 16kHz mono is the canonical input format for Whisper; the audio
/// normalizer resamples every upload to this rate.
pub const SAMPLE_RATE: u32 = 16_000;

/// Channel count after normalization (mono).
pub const CHANNELS: u16 = 1;

/// Filename suffix appended to normalized audio artifacts.
///
/// `call.wav` becomes `call_processed.wav`, written next to the input so
/// repeated runs on the same upload overwrite their own artifact rather
/// than colliding with the original.
pub const PROCESSED_SUFFIX: &str = "_processed";

/// Conversion tool invoked for audio normalization.
pub const FFMPEG_BIN: &str = "ffmpeg";

/// Default Whisper model name.
///
/// "base" (multilingual) handles the non-English source calls this tool
/// is built for. English-only variants (`base.en`) are smaller and faster
/// but cannot transcribe the default source language.
pub const DEFAULT_MODEL: &str = "base";

/// Default spoken language of incoming calls.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "hi";

/// Translation target language. Exported transcripts are always rendered
/// into English regardless of the source language.
pub const TARGET_LANGUAGE: &str = "en";

/// Default translation endpoint (Google translate web API, "gtx" client).
pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Default timeout for a single translation request, in seconds.
pub const TRANSLATION_TIMEOUT_SECS: u64 = 30;

/// Default directory for exported call records.
pub const RESULTS_DIR: &str = "results";

/// Report the GPU backend compiled into this build.
///
/// Returns a human-readable name based on the compile-time feature flags.
/// Only one GPU backend can be active at a time; if none is enabled, returns "CPU".
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") {
        "CUDA"
    } else if cfg!(feature = "vulkan") {
        "Vulkan"
    } else if cfg!(feature = "hipblas") {
        "HipBLAS (AMD)"
    } else if cfg!(feature = "openblas") {
        "OpenBLAS"
    } else {
        "CPU"
    }
}
