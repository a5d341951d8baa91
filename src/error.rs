//! Error types for translation.
//!
//! `ProviderError` describes one failed call to one backend and is recovered
//! locally (next provider, next attempt). `TranslateError` is what callers of
//! the pipeline see.

use thiserror::Error;

/// A single failed call to a translation backend.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network failure, timeout or an unreadable body
    #[error("{provider}: request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx HTTP status, or a backend-level status reported in the body
    #[error("{provider}: HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Body parsed but did not have the expected shape
    #[error("{provider}: malformed response: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },

    /// Well-formed response with nothing in it
    #[error("{provider}: empty translation")]
    EmptyTranslation { provider: &'static str },
}

impl ProviderError {
    /// Name of the provider that produced this error.
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::Request { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::MalformedResponse { provider, .. }
            | ProviderError::EmptyTranslation { provider } => provider,
        }
    }
}

/// Errors surfaced by the translation pipeline.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Input was blank after trimming; nothing was sent anywhere
    #[error("Text to translate is empty")]
    EmptyInput,

    #[error("Unsupported language code: '{0}'")]
    UnsupportedLanguage(String),

    /// Every provider failed on every attempt for one chunk
    #[error("All translation providers failed after {attempts} attempts: {last_error}")]
    ProviderExhausted {
        attempts: u32,
        #[source]
        last_error: ProviderError,
    },

    /// Too many chunks failed; partial results are discarded
    #[error(
        "Translation quality too low: {failed} of {total} chunks failed to translate"
    )]
    QualityThresholdExceeded { failed: usize, total: usize },

    #[error("Translation cancelled after {completed} of {total} chunks")]
    Cancelled { completed: usize, total: usize },
}

/// Result type for pipeline operations
pub type TranslateResult<T> = Result<T, TranslateError>;
