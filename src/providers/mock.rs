//! Scripted provider for unit tests.
//!
//! Each `MockProvider` records the texts it was asked to translate and can
//! optionally append its name to a shared [`CallLog`], which lets tests check
//! the order in which providers were tried.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::ProviderError;
use crate::i18n::Language;
use crate::providers::TranslationProvider;

/// Shared, ordered record of provider invocations.
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

type Responder = dyn Fn(&str, usize) -> Result<String, ProviderError> + Send + Sync;

/// A provider whose answers come from a closure.
///
/// The closure receives the text and the zero-based call number.
pub struct MockProvider {
    name: &'static str,
    responder: Box<Responder>,
    calls: Mutex<Vec<String>>,
    log: Option<CallLog>,
}

impl MockProvider {
    pub fn new<F>(name: &'static str, responder: F) -> Self
    where
        F: Fn(&str, usize) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            name,
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            log: None,
        }
    }

    /// Always succeeds with `"{prefix}{text}"`.
    pub fn echo(name: &'static str, prefix: &'static str) -> Self {
        Self::new(name, move |text, _| Ok(format!("{}{}", prefix, text)))
    }

    /// Always fails with HTTP 503.
    pub fn failing(name: &'static str) -> Self {
        Self::new(name, move |_, _| Err(unavailable(name)))
    }

    /// Fails the first `failures` calls, then behaves like [`MockProvider::echo`].
    pub fn failing_times(name: &'static str, failures: usize, prefix: &'static str) -> Self {
        Self::new(name, move |text, call| {
            if call < failures {
                Err(unavailable(name))
            } else {
                Ok(format!("{}{}", prefix, text))
            }
        })
    }

    /// Fails for any text containing `marker`, echoes everything else.
    pub fn failing_on(name: &'static str, marker: &'static str, prefix: &'static str) -> Self {
        Self::new(name, move |text, _| {
            if text.contains(marker) {
                Err(unavailable(name))
            } else {
                Ok(format!("{}{}", prefix, text))
            }
        })
    }

    /// Record every call in `log` as well.
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Texts received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

fn unavailable(provider: &'static str) -> ProviderError {
    ProviderError::Status {
        provider,
        status: 503,
        body: "mock provider unavailable".to_string(),
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn translate(
        &self,
        text: &str,
        _source: Language,
        _target: Language,
    ) -> Result<String, ProviderError> {
        let call = {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            calls.push(text.to_string());
            calls.len() - 1
        };
        if let Some(log) = &self.log {
            log.lock().unwrap_or_else(|e| e.into_inner()).push(self.name);
        }

        (self.responder)(text, call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_records_calls() {
        let provider = MockProvider::echo("mock", "bs:");

        let result = provider
            .translate("hello", Language::ENGLISH, Language::BOSNIAN)
            .await
            .unwrap();

        assert_eq!(result, "bs:hello");
        assert_eq!(provider.calls(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_failing_times_then_succeeds() {
        let provider = MockProvider::failing_times("flaky", 2, "");

        for _ in 0..2 {
            assert!(provider
                .translate("x", Language::ENGLISH, Language::BOSNIAN)
                .await
                .is_err());
        }
        assert_eq!(
            provider
                .translate("x", Language::ENGLISH, Language::BOSNIAN)
                .await
                .unwrap(),
            "x"
        );
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_shared_log_preserves_order() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let a = MockProvider::failing("a").with_log(log.clone());
        let b = MockProvider::echo("b", "").with_log(log.clone());

        let _ = a.translate("t", Language::ENGLISH, Language::CHINESE).await;
        let _ = b.translate("t", Language::ENGLISH, Language::CHINESE).await;
        let _ = a.translate("t", Language::ENGLISH, Language::CHINESE).await;

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "a"]);
    }
}
