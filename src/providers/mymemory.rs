//! MyMemory translation-memory provider.
//!
//! `GET /get?q=..&langpair=en|bs&de=<email>&mt=1` answers with
//! `{"responseData": {"translatedText": ".."}, "responseStatus": 200}`.
//! Quota and validation problems come back as HTTP 200 with a non-200
//! `responseStatus`, so the body status is checked too.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::i18n::Language;
use crate::providers::{read_success_body, TranslationProvider};

pub const DEFAULT_MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";

/// Contact address sent as `de` unless `MYMEMORY_EMAIL` overrides it
pub const DEFAULT_MYMEMORY_EMAIL: &str = "bosnian-translate@example.com";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    /// Number on success, sometimes a string on errors
    #[serde(default)]
    response_status: Option<Value>,
    #[serde(default)]
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

/// Fallback translation backend.
#[derive(Debug, Clone)]
pub struct MyMemoryProvider {
    client: reqwest::Client,
    base_url: String,
    /// Contact address; raises the anonymous daily quota
    contact_email: Option<String>,
}

impl MyMemoryProvider {
    pub const NAME: &'static str = "mymemory";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            contact_email: None,
        }
    }

    pub fn with_contact_email(mut self, email: Option<String>) -> Self {
        self.contact_email = email.filter(|e| !e.trim().is_empty());
        self
    }

    fn query(&self, text: &str, source: Language, target: Language) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("q", text.to_string()),
            (
                "langpair",
                format!("{}|{}", source.provider_code(), target.provider_code()),
            ),
        ];
        if let Some(email) = &self.contact_email {
            query.push(("de", email.clone()));
        }
        query.push(("mt", "1".to_string()));
        query
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
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
            .query(&self.query(text, source, target))
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                provider: Self::NAME,
                source,
            })?;

        let body = read_success_body(Self::NAME, response).await?;
        let parsed: MyMemoryResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::MalformedResponse {
                provider: Self::NAME,
                detail: format!("invalid JSON: {}", e),
            })?;

        parse_response(parsed)
    }
}

fn parse_response(response: MyMemoryResponse) -> Result<String, ProviderError> {
    if let Some(status) = response.response_status.as_ref().and_then(status_code) {
        if status != 200 {
            return Err(ProviderError::Status {
                provider: MyMemoryProvider::NAME,
                status,
                body: response.response_details.unwrap_or_default(),
            });
        }
    }

    let translated = response
        .response_data
        .ok_or_else(|| ProviderError::MalformedResponse {
            provider: MyMemoryProvider::NAME,
            detail: "missing responseData".to_string(),
        })?
        .translated_text
        .unwrap_or_default();

    let translated = translated.trim();
    if translated.is_empty() {
        return Err(ProviderError::EmptyTranslation {
            provider: MyMemoryProvider::NAME,
        });
    }

    Ok(translated.to_string())
}

fn status_code(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
