use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::chunker::{BATCH_CHUNK_SIZE, INTERACTIVE_CHUNK_SIZE};
use crate::pipeline::{PacingPolicy, PipelineOptions, TranslationMode, DEFAULT_FAILURE_THRESHOLD};
use crate::providers::google::DEFAULT_GOOGLE_TRANSLATE_URL;
use crate::providers::mymemory::{DEFAULT_MYMEMORY_EMAIL, DEFAULT_MYMEMORY_URL};
use crate::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    // Providers
    pub google_translate_url: String,
    pub mymemory_url: String,
    pub mymemory_email: String,
    pub request_timeout_secs: u64,

    // Chunking
    pub max_chunk_size: usize,
    pub batch_chunk_size: usize,

    // Resilience
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub failure_threshold: f64,

    // Server
    pub api_key: Option<String>,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_translate_url: DEFAULT_GOOGLE_TRANSLATE_URL.to_string(),
            mymemory_url: DEFAULT_MYMEMORY_URL.to_string(),
            mymemory_email: DEFAULT_MYMEMORY_EMAIL.to_string(),
            request_timeout_secs: 30,
            max_chunk_size: INTERACTIVE_CHUNK_SIZE,
            batch_chunk_size: BATCH_CHUNK_SIZE,
            max_attempts: 5,
            base_delay_ms: 1000,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            api_key: None,
            port: 8080,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            // Providers
            google_translate_url: std::env::var("GOOGLE_TRANSLATE_URL")
                .unwrap_or(defaults.google_translate_url),
            mymemory_url: std::env::var("MYMEMORY_URL").unwrap_or(defaults.mymemory_url),
            mymemory_email: non_empty_var("MYMEMORY_EMAIL").unwrap_or(defaults.mymemory_email),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),

            // Chunking
            max_chunk_size: parse_var("MAX_CHUNK_SIZE")?.unwrap_or(defaults.max_chunk_size),
            batch_chunk_size: parse_var("BATCH_CHUNK_SIZE")?.unwrap_or(defaults.batch_chunk_size),

            // Resilience
            max_attempts: parse_var("TRANSLATION_MAX_ATTEMPTS")?.unwrap_or(defaults.max_attempts),
            base_delay_ms: parse_var("TRANSLATION_BASE_DELAY_MS")?
                .unwrap_or(defaults.base_delay_ms),
            failure_threshold: parse_var("FAILURE_THRESHOLD")?
                .unwrap_or(defaults.failure_threshold),

            // Server
            api_key: non_empty_var("API_KEY"),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 || self.batch_chunk_size == 0 {
            bail!("Chunk sizes must be at least 1");
        }
        if self.max_attempts == 0 {
            bail!("TRANSLATION_MAX_ATTEMPTS must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.failure_threshold) {
            bail!(
                "FAILURE_THRESHOLD must be between 0 and 1, got {}",
                self.failure_threshold
            );
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }

    pub fn pipeline_options(&self, mode: TranslationMode) -> PipelineOptions {
        let max_chunk_size = match mode {
            TranslationMode::Interactive => self.max_chunk_size,
            TranslationMode::Batch => self.batch_chunk_size,
        };

        PipelineOptions {
            max_chunk_size,
            pacing: PacingPolicy::rate_limited(),
            failure_threshold: self.failure_threshold,
        }
    }

    /// Shared HTTP client for both providers.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an optional variable; a set but unparsable value is an error.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value: '{}'", name, raw)),
        _ => Ok(None),
    }
}
