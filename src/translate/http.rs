//! HTTP translation client for the Google translate web endpoint.
//!
//! Talks to the free "gtx" endpoint (the same service the googletrans
//! family of clients uses). The response is a nested JSON array whose
//! first element holds per-sentence segments; the translated text is the
//! concatenation of each segment's first field.

use crate::defaults;
use crate::error::{CallscribeError, Result};
use crate::translate::Translator;
use std::time::Duration;

/// Translator backed by an HTTP endpoint.
///
/// Uses a blocking client because translation runs inside the synchronous
/// pipeline worker; the request timeout keeps the best-effort stage from
/// stalling a job indefinitely.
pub struct HttpTranslator {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl std::fmt::Debug for HttpTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTranslator")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpTranslator {
    /// Create a translator against `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CallscribeError::translation(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

/// Extract the translated text from a gtx-style response body.
///
/// Body shape: `[[["translated","original",...],["seg2",...]], null, "hi", ...]`
pub fn parse_gtx_response(body: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| CallscribeError::translation(format!("malformed response: {}", e)))?;

    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| CallscribeError::translation("response missing segment array"))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(text) = segment.get(0).and_then(|v| v.as_str()) {
            translated.push_str(text);
        }
    }

    if translated.is_empty() {
        return Err(CallscribeError::translation(
            "response contained no translated text",
        ));
    }

    Ok(translated)
}

impl Translator for HttpTranslator {
    fn translate(&self, text: &str, source_lang: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", defaults::TARGET_LANGUAGE),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .map_err(|e| CallscribeError::translation(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallscribeError::translation(format!(
                "service returned {}",
                status
            )));
        }

        let body = response
            .text()
            .map_err(|e| CallscribeError::translation(format!("failed to read response: {}", e)))?;

        parse_gtx_response(&body)
    }

    fn engine_name(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_segment() {
        let body = r#"[[["I want to buy the flat","मुझे फ्लैट खरीदना है",null,null,10]],null,"hi"]"#;
        assert_eq!(parse_gtx_response(body).unwrap(), "I want to buy the flat");
    }

    #[test]
    fn test_parse_concatenates_segments() {
        let body = r#"[[["Hello. ","नमस्ते।"],["How are you?","आप कैसे हैं?"]],null,"hi"]"#;
        assert_eq!(parse_gtx_response(body).unwrap(), "Hello. How are you?");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let result = parse_gtx_response("not json");
        assert!(matches!(
            result,
            Err(CallscribeError::EngineUnavailable { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_missing_segments() {
        let result = parse_gtx_response(r#"{"error": "quota"}"#);
        assert!(matches!(
            result,
            Err(CallscribeError::EngineUnavailable { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_empty_translation() {
        let result = parse_gtx_response(r#"[[],null,"hi"]"#);
        assert!(matches!(
            result,
            Err(CallscribeError::EngineUnavailable { .. })
        ));
    }

    #[test]
    fn test_translator_construction() {
        let translator =
            HttpTranslator::new("http://localhost:9/translate", Duration::from_secs(1)).unwrap();
        assert_eq!(translator.engine_name(), "http://localhost:9/translate");
    }

    #[test]
    fn test_unreachable_endpoint_maps_to_engine_unavailable() {
        // Port 9 (discard) with a 1s timeout: connection refused immediately.
        let translator =
            HttpTranslator::new("http://127.0.0.1:9/translate", Duration::from_secs(1)).unwrap();

        match translator.translate("hello", "hi") {
            Err(CallscribeError::EngineUnavailable { engine, .. }) => {
                assert_eq!(engine, "translation");
            }
            other => panic!("Expected EngineUnavailable, got {:?}", other),
        }
    }
}
