//! Whisper model metadata catalog.
//!
//! Models from the whisper.cpp collection on HuggingFace. Multilingual
//! variants are required for non-English calls; `.en` variants are listed
//! for deployments that only ever see English audio.

/// Metadata for a Whisper model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    /// Model identifier (e.g., "tiny", "base", "large-v3")
    pub name: &'static str,
    /// Model size in megabytes
    pub size_mb: u32,
    /// SHA-1 checksum for integrity verification (empty = not pinned)
    pub sha1: &'static str,
    /// Download URL from HuggingFace
    pub url: &'static str,
    /// Whether this model supports English only
    pub english_only: bool,
}

/// Catalog of available Whisper models.
///
/// Models range from tiny (75 MB, fast, lower accuracy) to large-v3
/// (3095 MB, slower, highest accuracy).
pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "tiny",
        size_mb: 75,
        sha1: "bd577a113a864445d4c299885e0cb97d4ba92b5f",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.bin",
        english_only: false,
    },
    ModelInfo {
        name: "tiny.en",
        size_mb: 75,
        sha1: "c78c86eb1a8faa21b369bcd33207cc90d64ae9df",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.en.bin",
        english_only: true,
    },
    ModelInfo {
        name: "base",
        size_mb: 142,
        sha1: "465707469ff3a37a2b9b8d8f89f2f99de7299dac",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin",
        english_only: false,
    },
    ModelInfo {
        name: "base.en",
        size_mb: 142,
        sha1: "137c40403d78fd54d454da0f9bd998f78703390c",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin",
        english_only: true,
    },
    ModelInfo {
        name: "small",
        size_mb: 466,
        sha1: "55356645c2b361a969dfd0ef2c5a50d530afd8d5",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-small.bin",
        english_only: false,
    },
    ModelInfo {
        name: "small.en",
        size_mb: 466,
        sha1: "db8a495a91d927739e50b3fc1cc4c6b8f6c2d022",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-small.en.bin",
        english_only: true,
    },
    ModelInfo {
        name: "medium",
        size_mb: 1533,
        sha1: "fd9727b6e1217c2f614f9b698455c4ffd82463b4",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-medium.bin",
        english_only: false,
    },
    ModelInfo {
        name: "large-v3",
        size_mb: 3095,
        sha1: "ad82bf6a9043ceed055076d0fd39f5f186ff8062",
        url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-large-v3.bin",
        english_only: false,
    },
];

/// Find a model by name.
pub fn get_model(name: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.name == name)
}

/// Get all available models.
pub fn list_models() -> &'static [ModelInfo] {
    MODELS
}

/// Get the default recommended model.
///
/// `base` is the smallest multilingual model, which non-English sales calls
/// need; English-only variants cannot transcribe them at all.
pub fn default_model() -> &'static ModelInfo {
    // The catalog always contains "base"; guarded by a test below.
    get_model(crate::defaults::DEFAULT_MODEL).unwrap_or(&MODELS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_model_finds_known_models() {
        assert!(get_model("base").is_some());
        assert!(get_model("large-v3").is_some());
        assert!(get_model("nonexistent").is_none());
    }

    #[test]
    fn test_default_model_is_multilingual() {
        let model = default_model();
        assert_eq!(model.name, "base");
        assert!(!model.english_only);
    }

    #[test]
    fn test_english_only_flag_matches_suffix() {
        for model in list_models() {
            assert_eq!(model.english_only, model.name.ends_with(".en"));
        }
    }

    #[test]
    fn test_model_urls_point_at_their_own_file() {
        for model in list_models() {
            assert!(
                model.url.ends_with(&format!("ggml-{}.bin", model.name)),
                "URL mismatch for {}",
                model.name
            );
        }
    }

    #[test]
    fn test_model_names_are_unique() {
        let mut names: Vec<&str> = list_models().iter().map(|m| m.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), list_models().len());
    }
}
