//! callscribe - sales call transcription and interest analysis
//!
//! Normalizes recorded sales calls, transcribes them with Whisper,
//! translates transcripts to English, and scores customer interest.

// Error handling discipline: library code propagates, it never unwraps.
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod interest;
pub mod models;
pub mod pipeline;
pub mod stt;
pub mod translate;

// Core pipeline surface
pub use pipeline::{CallJob, CallPipeline, CallResult, ProgressEvent, Stage};

// Engine seams (external collaborators)
pub use audio::{AudioNormalizer, CommandRunner, SystemCommandRunner};
pub use stt::{Transcriber, Transcript};
pub use translate::Translator;

// Scoring
pub use interest::{InterestScorer, Verdict};

// Error handling
pub use error::{CallscribeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
