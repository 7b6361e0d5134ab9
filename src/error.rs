//! Error types for callscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallscribeError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio normalization errors
    #[error("Audio tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("Audio normalization failed: {message}")]
    PreprocessFailed { message: String },

    #[error("Audio normalization produced no output file at {path}")]
    PreprocessOutputMissing { path: String },

    #[error("Audio format mismatch: expected {expected}, got {actual}")]
    AudioFormatMismatch { expected: String, actual: String },

    // Engine errors (transcription / translation backends)
    #[error("Speech model not found at {path}")]
    ModelNotFound { path: String },

    #[error("{engine} engine unavailable: {message}")]
    EngineUnavailable { engine: String, message: String },

    #[error("Transcription produced no usable text")]
    EmptyTranscript,

    // Job and export errors
    #[error("Invalid call job: {message}")]
    InvalidJob { message: String },

    #[error("Result export failed: {message}")]
    Export { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl CallscribeError {
    /// Shorthand for a transcription backend failure.
    pub fn transcription(message: impl Into<String>) -> Self {
        CallscribeError::EngineUnavailable {
            engine: "transcription".to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a translation backend failure.
    pub fn translation(message: impl Into<String>) -> Self {
        CallscribeError::EngineUnavailable {
            engine: "translation".to_string(),
            message: message.into(),
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CallscribeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_invalid_value_display() {
        let error = CallscribeError::ConfigInvalidValue {
            key: "sample_rate".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for sample_rate: must be positive"
        );
    }

    #[test]
    fn test_tool_not_found_display() {
        let error = CallscribeError::ToolNotFound {
            tool: "ffmpeg".to_string(),
        };
        assert_eq!(error.to_string(), "Audio tool not found: ffmpeg");
    }

    #[test]
    fn test_preprocess_failed_display() {
        let error = CallscribeError::PreprocessFailed {
            message: "exit status 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Audio normalization failed: exit status 1"
        );
    }

    #[test]
    fn test_preprocess_output_missing_display() {
        let error = CallscribeError::PreprocessOutputMissing {
            path: "/tmp/call_processed.wav".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Audio normalization produced no output file at /tmp/call_processed.wav"
        );
    }

    #[test]
    fn test_audio_format_mismatch_display() {
        let error = CallscribeError::AudioFormatMismatch {
            expected: "16kHz mono".to_string(),
            actual: "44.1kHz stereo".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Audio format mismatch: expected 16kHz mono, got 44.1kHz stereo"
        );
    }

    #[test]
    fn test_model_not_found_display() {
        let error = CallscribeError::ModelNotFound {
            path: "/models/ggml-base.bin".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Speech model not found at /models/ggml-base.bin"
        );
    }

    #[test]
    fn test_engine_unavailable_display() {
        let error = CallscribeError::transcription("inference failed");
        assert_eq!(
            error.to_string(),
            "transcription engine unavailable: inference failed"
        );

        let error = CallscribeError::translation("connection refused");
        assert_eq!(
            error.to_string(),
            "translation engine unavailable: connection refused"
        );
    }

    #[test]
    fn test_empty_transcript_display() {
        assert_eq!(
            CallscribeError::EmptyTranscript.to_string(),
            "Transcription produced no usable text"
        );
    }

    #[test]
    fn test_invalid_job_display() {
        let error = CallscribeError::InvalidJob {
            message: "client name is empty".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid call job: client name is empty");
    }

    #[test]
    fn test_export_display() {
        let error = CallscribeError::Export {
            message: "unterminated quoted field".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Result export failed: unterminated quoted field"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: CallscribeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: CallscribeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<CallscribeError>();
        assert_sync::<CallscribeError>();
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: CallscribeError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }
}
