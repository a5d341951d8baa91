//! Google Translate provider (public `translate_a/single` endpoint).
//!
//! The endpoint needs no API key and answers with nested JSON arrays:
//!
//! ```text
//! [[["Dobro jutro. ","Good morning. ",null,null,1],["Kako si?","How are you?",...]],null,"en",...]
//! ```
//!
//! Each element of `response[0]` is one translated segment, with the
//! translation at index 0.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::ProviderError;
use crate::i18n::Language;
use crate::providers::{read_success_body, TranslationProvider};

pub const DEFAULT_GOOGLE_TRANSLATE_URL: &str =
    "https://translate.googleapis.com/translate_a/single";

/// Primary translation backend.
#[derive(Debug, Clone)]
pub struct GoogleTranslateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslateProvider {
    pub const NAME: &'static str = "google";

    /// `client` query parameter value expected by the public endpoint
    const CLIENT_ID: &'static str = "gtx";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("client", Self::CLIENT_ID),
                ("sl", source.provider_code()),
                ("tl", target.provider_code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                provider: Self::NAME,
                source,
            })?;

        let body = read_success_body(Self::NAME, response).await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse {
                provider: Self::NAME,
                detail: format!("invalid JSON: {}", e),
            })?;

        let translated = parse_response(&value)?;
        debug!(
            "{}: translated {} chars into {} chars",
            Self::NAME,
            text.chars().count(),
            translated.chars().count()
        );
        Ok(translated)
    }
}

/// Extract and join the translated segments.
fn parse_response(value: &Value) -> Result<String, ProviderError> {
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("expected an array of segments at [0]"))?;

    let first = segments
        .first()
        .and_then(|segment| segment.get(0))
        .ok_or_else(|| malformed("missing translated text at [0][0][0]"))?;
    if !first.is_string() {
        return Err(malformed("translated text at [0][0][0] is not a string"));
    }

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let translated = translated.trim();
    if translated.is_empty() {
        return Err(ProviderError::EmptyTranslation {
            provider: GoogleTranslateProvider::NAME,
        });
    }

    Ok(translated.to_string())
}

fn malformed(detail: &str) -> ProviderError {
    ProviderError::MalformedResponse {
        provider: GoogleTranslateProvider::NAME,
        detail: detail.to_string(),
    }
}
