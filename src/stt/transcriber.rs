use crate::error::{CallscribeError, Result};
use std::path::Path;
use std::sync::Arc;

/// Speech-to-text output: raw text in the spoken language of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// Transcribed text, untranslated.
    pub text: String,
    /// Language tag reported by the engine (e.g. "hi").
    pub language: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }

    /// True when the engine produced no usable text.
    ///
    /// Whitespace-only output counts as empty: Whisper emits stray spaces
    /// and newlines on silent audio.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Trait for speech-to-text transcription of a normalized audio file.
///
/// This trait allows swapping implementations (real Whisper vs mock).
pub trait Transcriber: Send + Sync {
    /// Transcribe a normalized (16kHz mono WAV) audio file.
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;

    /// Name of the engine/model for logging
    fn engine_name(&self) -> &str;

    /// Check if the transcriber is ready
    fn is_ready(&self) -> bool;
}

/// Implement Transcriber for Arc<T> to allow sharing across jobs.
impl<T: Transcriber> Transcriber for Arc<T> {
    fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        (**self).transcribe(audio_path)
    }

    fn engine_name(&self) -> &str {
        (**self).engine_name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    engine_name: String,
    response: Transcript,
    should_fail: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(engine_name: &str) -> Self {
        Self {
            engine_name: engine_name.to_string(),
            response: Transcript::new("mock transcription", "hi"),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific transcript
    pub fn with_response(mut self, text: &str, language: &str) -> Self {
        self.response = Transcript::new(text, language);
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio_path: &Path) -> Result<Transcript> {
        if self.should_fail {
            Err(CallscribeError::transcription("mock transcription failure"))
        } else {
            Ok(self.response.clone())
        }
    }

    fn engine_name(&self) -> &str {
        &self.engine_name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}
