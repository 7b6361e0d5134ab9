use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub stt: SttConfig,
    pub translation: TranslationConfig,
    pub export: ExportConfig,
}

/// Audio normalization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub ffmpeg_path: String,
    pub sample_rate: u32,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    pub model: String,
    /// Spoken language of incoming calls (also the translation source).
    pub language: String,
    pub threads: Option<usize>,
}

/// Translation service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

/// Result export configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub results_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: defaults::FFMPEG_BIN.to_string(),
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            language: defaults::DEFAULT_SOURCE_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_TRANSLATE_ENDPOINT.to_string(),
            timeout_secs: defaults::TRANSLATION_TIMEOUT_SECS,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(defaults::RESULTS_DIR),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML or invalid values.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.audio.ffmpeg_path.trim().is_empty() {
            anyhow::bail!("audio.ffmpeg_path must not be empty");
        }
        if self.audio.sample_rate == 0 {
            anyhow::bail!("audio.sample_rate must be positive");
        }
        if self.stt.language.trim().is_empty() {
            anyhow::bail!("stt.language must not be empty");
        }
        if self.translation.endpoint.trim().is_empty() {
            anyhow::bail!("translation.endpoint must not be empty");
        }
        if self.translation.timeout_secs == 0 {
            anyhow::bail!("translation.timeout_secs must be positive");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - CALLSCRIBE_MODEL → stt.model
    /// - CALLSCRIBE_LANGUAGE → stt.language
    /// - CALLSCRIBE_FFMPEG → audio.ffmpeg_path
    /// - CALLSCRIBE_TRANSLATE_ENDPOINT → translation.endpoint
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("CALLSCRIBE_MODEL")
            && !model.is_empty()
        {
            self.stt.model = model;
        }

        if let Ok(language) = std::env::var("CALLSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.stt.language = language;
        }

        if let Ok(ffmpeg) = std::env::var("CALLSCRIBE_FFMPEG")
            && !ffmpeg.is_empty()
        {
            self.audio.ffmpeg_path = ffmpeg;
        }

        if let Ok(endpoint) = std::env::var("CALLSCRIBE_TRANSLATE_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.translation.endpoint = endpoint;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/callscribe/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("callscribe")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_callscribe_env() {
        remove_env("CALLSCRIBE_MODEL");
        remove_env("CALLSCRIBE_LANGUAGE");
        remove_env("CALLSCRIBE_FFMPEG");
        remove_env("CALLSCRIBE_TRANSLATE_ENDPOINT");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.audio.ffmpeg_path, "ffmpeg");
        assert_eq!(config.audio.sample_rate, 16000);

        assert_eq!(config.stt.model, "base");
        assert_eq!(config.stt.language, "hi");
        assert_eq!(config.stt.threads, None);

        assert_eq!(
            config.translation.endpoint,
            "https://translate.googleapis.com/translate_a/single"
        );
        assert_eq!(config.translation.timeout_secs, 30);

        assert_eq!(config.export.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [audio]
            ffmpeg_path = "/usr/local/bin/ffmpeg"
            sample_rate = 16000

            [stt]
            model = "small"
            language = "mr"
            threads = 4

            [translation]
            endpoint = "http://localhost:8080/translate"
            timeout_secs = 10

            [export]
            results_dir = "/var/lib/callscribe/results"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.audio.ffmpeg_path, "/usr/local/bin/ffmpeg");
        assert_eq!(config.stt.model, "small");
        assert_eq!(config.stt.language, "mr");
        assert_eq!(config.stt.threads, Some(4));
        assert_eq!(config.translation.endpoint, "http://localhost:8080/translate");
        assert_eq!(config.translation.timeout_secs, 10);
        assert_eq!(
            config.export.results_dir,
            PathBuf::from("/var/lib/callscribe/results")
        );
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let toml_content = r#"
            [stt]
            model = "medium"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.stt.model, "medium");
        assert_eq!(config.stt.language, "hi");
        assert_eq!(config.audio.ffmpeg_path, "ffmpeg");
        assert_eq!(config.translation.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let toml_content = r#"
            [translation]
            timeout_secs = 0
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let invalid_toml = r#"
            [audio
            ffmpeg_path = "broken
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        assert!(Config::load(temp_file.path()).is_err());
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_callscribe_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_override_model() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_callscribe_env();

        set_env("CALLSCRIBE_MODEL", "tiny");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.stt.model, "tiny");
        assert_eq!(config.stt.language, "hi"); // Not overridden

        clear_callscribe_env();
    }

    #[test]
    fn test_env_override_all() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_callscribe_env();

        set_env("CALLSCRIBE_MODEL", "medium");
        set_env("CALLSCRIBE_LANGUAGE", "ta");
        set_env("CALLSCRIBE_FFMPEG", "/opt/ffmpeg/bin/ffmpeg");
        set_env("CALLSCRIBE_TRANSLATE_ENDPOINT", "http://translate.internal");

        let config = Config::default().with_env_overrides();

        assert_eq!(config.stt.model, "medium");
        assert_eq!(config.stt.language, "ta");
        assert_eq!(config.audio.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(config.translation.endpoint, "http://translate.internal");

        clear_callscribe_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_callscribe_env();

        set_env("CALLSCRIBE_MODEL", "");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.stt.model, "base");

        clear_callscribe_env();
    }

    #[test]
    fn test_default_path_is_xdg_compliant() {
        let path = Config::default_path();
        let path_str = path.to_string_lossy();

        assert!(path_str.contains("callscribe"));
        assert!(path_str.ends_with("config.toml"));
    }
}
