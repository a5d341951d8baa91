//! Translation backends.
//!
//! - `google`: public Google Translate endpoint (primary)
//! - `mymemory`: MyMemory translation-memory endpoint (fallback)
//! - `mock`: scripted provider for unit tests
//! - `fallback`: ordered provider chain with retry/backoff

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::i18n::Language;

pub mod fallback;
pub mod google;
#[cfg(test)]
pub mod mock;
pub mod mymemory;

pub use fallback::FallbackTranslator;
pub use google::GoogleTranslateProvider;
#[cfg(test)]
pub use mock::MockProvider;
pub use mymemory::MyMemoryProvider;

/// A single translation backend.
///
/// Implementations make one request per call and never retry on their own;
/// retries and fallback belong to [`FallbackTranslator`].
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Translate `text` from `source` to `target`.
    ///
    /// An `Ok` value may still be blank; the caller decides whether that
    /// counts as a failure.
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, ProviderError>;
}

/// Read a response body, turning non-2xx statuses into `ProviderError::Status`.
pub(crate) async fn read_success_body(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}
