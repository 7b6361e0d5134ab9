//! Transcript translation engines.
//!
//! Translation is the pipeline's one best-effort stage: a failed
//! translation degrades the call record instead of aborting the job, so
//! implementations should fail fast (bounded timeouts) rather than hang.

pub mod http;

pub use http::HttpTranslator;

use crate::error::{CallscribeError, Result};
use std::sync::Arc;

/// Trait for translating transcript text into English.
///
/// This trait allows swapping implementations (real HTTP service vs mock).
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_lang` into English.
    fn translate(&self, text: &str, source_lang: &str) -> Result<String>;

    /// Name of the backing service for logging
    fn engine_name(&self) -> &str;
}

/// Implement Translator for Arc<T> to allow sharing across jobs.
impl<T: Translator> Translator for Arc<T> {
    fn translate(&self, text: &str, source_lang: &str) -> Result<String> {
        (**self).translate(text, source_lang)
    }

    fn engine_name(&self) -> &str {
        (**self).engine_name()
    }
}

/// Mock translator for testing
#[derive(Debug, Clone)]
pub struct MockTranslator {
    engine_name: String,
    response: String,
    should_fail: bool,
}

impl MockTranslator {
    /// Create a new mock translator with default settings
    pub fn new(engine_name: &str) -> Self {
        Self {
            engine_name: engine_name.to_string(),
            response: "mock translation".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on translate
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Translator for MockTranslator {
    fn translate(&self, _text: &str, _source_lang: &str) -> Result<String> {
        if self.should_fail {
            Err(CallscribeError::translation("mock translation failure"))
        } else {
            Ok(self.response.clone())
        }
    }

    fn engine_name(&self) -> &str {
        &self.engine_name
    }
}
