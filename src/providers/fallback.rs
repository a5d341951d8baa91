use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ProviderError, TranslateError, TranslateResult};
use crate::i18n::Language;
use crate::providers::TranslationProvider;
use crate::retry::{with_retry, RetryPolicy};

/// Ordered chain of providers with retry/backoff around the whole chain.
///
/// Within one attempt the first provider returning a non-blank translation
/// wins and the rest are skipped. An attempt fails only when every provider
/// fails; the chain is then retried according to the [`RetryPolicy`].
#[derive(Clone)]
pub struct FallbackTranslator {
    primary: Arc<dyn TranslationProvider>,
    fallbacks: Vec<Arc<dyn TranslationProvider>>,
    retry: RetryPolicy,
}

impl FallbackTranslator {
    /// Create a chain with a single (primary) provider.
    pub fn new(primary: Arc<dyn TranslationProvider>, retry: RetryPolicy) -> Self {
        Self {
            primary,
            fallbacks: Vec::new(),
            retry,
        }
    }

    /// Append a provider tried after all existing ones.
    pub fn with_fallback(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.fallbacks.push(provider);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<&'static str> {
        std::iter::once(&self.primary)
            .chain(&self.fallbacks)
            .map(|p| p.name())
            .collect()
    }

    /// Translate one chunk, failing only after every provider failed on every
    /// attempt.
    pub async fn translate_chunk(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> TranslateResult<String> {
        with_retry(&self.retry, "Chunk translation", || {
            self.try_providers(text, source, target)
        })
        .await
        .map_err(|last_error| TranslateError::ProviderExhausted {
            attempts: self.retry.max_attempts.max(1),
            last_error,
        })
    }

    /// One pass over the provider chain; the last provider's error is kept.
    async fn try_providers(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, ProviderError> {
        let mut result = try_provider(self.primary.as_ref(), text, source, target).await;

        for provider in &self.fallbacks {
            if result.is_ok() {
                break;
            }
            result = try_provider(provider.as_ref(), text, source, target).await;
        }

        result
    }
}

/// A blank translation counts as a failure of that provider.
async fn try_provider(
    provider: &dyn TranslationProvider,
    text: &str,
    source: Language,
    target: Language,
) -> Result<String, ProviderError> {
    match provider.translate(text, source, target).await {
        Ok(translated) if !translated.trim().is_empty() => {
            debug!("{}: chunk translated ({} -> {})", provider.name(), source, target);
            Ok(translated)
        }
        Ok(_) => {
            warn!("{}: returned an empty translation", provider.name());
            Err(ProviderError::EmptyTranslation {
                provider: provider.name(),
            })
        }
        Err(e) => {
            warn!("{} failed: {}", provider.name(), e);
            Err(e)
        }
    }
}
