//! Chunked translation pipeline.
//!
//! `Idle -> Chunking -> per-chunk loop -> Aggregating -> Completed | Aborted`,
//! with `Rejected` for blank input and `Cancelled` when the caller's token
//! fires between chunks.
//!
//! Chunks are translated strictly one after another with a growing pause
//! between them, which keeps the free backends from rate limiting us. A chunk
//! that cannot be translated is replaced by a visible placeholder instead of
//! being dropped; the whole call only fails when too many chunks did.

use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::chunker::{self, Chunk, BATCH_CHUNK_SIZE, INTERACTIVE_CHUNK_SIZE};
use crate::config::Config;
use crate::error::{TranslateError, TranslateResult};
use crate::i18n::Language;
use crate::providers::{FallbackTranslator, GoogleTranslateProvider, MyMemoryProvider};

/// Fraction of failed chunks above which a translation is rejected
pub const DEFAULT_FAILURE_THRESHOLD: f64 = 0.3;

/// Characters of the source chunk quoted in a failure placeholder
const PLACEHOLDER_PREVIEW_CHARS: usize = 30;

const FAILURE_MARKER: &str = "[Failed to translate:";

/// Pause inserted before each chunk after the first.
#[derive(Debug, Clone, PartialEq)]
pub struct PacingPolicy {
    pub base: Duration,
    /// Added per chunk index
    pub step: Duration,
    pub max: Duration,
}

impl PacingPolicy {
    /// 300ms + 50ms per chunk, capped at 2s
    pub fn rate_limited() -> Self {
        Self {
            base: Duration::from_millis(300),
            step: Duration::from_millis(50),
            max: Duration::from_millis(2000),
        }
    }

    /// No pauses at all (tests, mock providers)
    pub fn none() -> Self {
        Self {
            base: Duration::ZERO,
            step: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn delay_before_chunk(&self, index: usize) -> Duration {
        if index == 0 {
            return Duration::ZERO;
        }
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.base
            .saturating_add(self.step.saturating_mul(steps))
            .min(self.max)
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::rate_limited()
    }
}

/// Which chunk size preset to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// Short, typed-in text
    #[default]
    Interactive,
    /// Whole documents
    Batch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub max_chunk_size: usize,
    pub pacing: PacingPolicy,
    pub failure_threshold: f64,
}

impl PipelineOptions {
    pub fn interactive() -> Self {
        Self {
            max_chunk_size: INTERACTIVE_CHUNK_SIZE,
            pacing: PacingPolicy::rate_limited(),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }

    pub fn batch() -> Self {
        Self {
            max_chunk_size: BATCH_CHUNK_SIZE,
            ..Self::interactive()
        }
    }

    pub fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_failure_threshold(mut self, threshold: f64) -> Self {
        self.failure_threshold = threshold;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::interactive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkStatus {
    Translated(String),
    Failed {
        /// Text put in the output in place of the translation
        placeholder: String,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkResult {
    pub chunk_index: usize,
    pub status: ChunkStatus,
}

impl ChunkResult {
    /// Text contributed to the assembled output.
    pub fn output(&self) -> &str {
        match &self.status {
            ChunkStatus::Translated(text) => text,
            ChunkStatus::Failed { placeholder, .. } => placeholder,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ChunkStatus::Failed { .. })
    }
}

/// Per-chunk results of one translation call, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub results: Vec<ChunkResult>,
}

impl TranslationOutcome {
    pub fn total_chunks(&self) -> usize {
        self.results.len()
    }

    pub fn failed_chunks(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }

    pub fn failure_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.failed_chunks() as f64 / self.total_chunks() as f64
    }

    /// Strictly greater than: exactly `threshold` still passes.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.failure_rate() > threshold
    }

    /// Join all chunk outputs with blank lines.
    pub fn into_text(self) -> String {
        let joined = self
            .results
            .iter()
            .map(ChunkResult::output)
            .collect::<Vec<_>>()
            .join("\n\n");
        isolate_failure_markers(joined.trim())
    }
}

/// Placeholder used for a chunk that could not be translated.
pub fn failure_placeholder(chunk: &Chunk) -> String {
    format!(
        "{} \"{}...\"]",
        FAILURE_MARKER,
        chunk.preview(PLACEHOLDER_PREVIEW_CHARS)
    )
}

/// Make sure every failure marker starts on its own line.
pub fn isolate_failure_markers(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"([^\s])[ \t]*(\[Failed to translate:)").expect("marker regex is valid")
    });
    re.replace_all(text, "$1\n$2").into_owned()
}

/// Chunked translator with fallback providers, pacing and a quality gate.
#[derive(Clone)]
pub struct TranslationPipeline {
    translator: FallbackTranslator,
    options: PipelineOptions,
}

impl TranslationPipeline {
    pub fn new(translator: FallbackTranslator, options: PipelineOptions) -> Self {
        Self {
            translator,
            options,
        }
    }

    /// Google first, MyMemory second, settings from `config`.
    pub fn from_config(config: &Config, client: reqwest::Client, mode: TranslationMode) -> Self {
        let google = GoogleTranslateProvider::new(client.clone(), config.google_translate_url.clone());
        let mymemory = MyMemoryProvider::new(client, config.mymemory_url.clone())
            .with_contact_email(Some(config.mymemory_email.clone()));

        let translator = FallbackTranslator::new(Arc::new(google), config.retry_policy())
            .with_fallback(Arc::new(mymemory));

        Self::new(translator, config.pipeline_options(mode))
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Translate `text`, returning the assembled translation.
    ///
    /// # Errors
    /// * `EmptyInput` for blank text (no network call is made)
    /// * `QualityThresholdExceeded` when more than the configured share of
    ///   chunks failed; partial results are discarded
    pub async fn translate_text(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> TranslateResult<String> {
        self.translate_text_cancellable(text, source, target, &CancellationToken::new())
            .await
    }

    /// [`translate_text`](Self::translate_text) that stops between chunks once
    /// `cancel` fires.
    pub async fn translate_text_cancellable(
        &self,
        text: &str,
        source: Language,
        target: Language,
        cancel: &CancellationToken,
    ) -> TranslateResult<String> {
        let outcome = self.translate_outcome(text, source, target, cancel).await?;

        let failed = outcome.failed_chunks();
        let total = outcome.total_chunks();
        info!("Aggregating: {}/{} chunks failed", failed, total);

        if outcome.exceeds(self.options.failure_threshold) {
            error!(
                "Aborted: failure rate {:.0}% is above {:.0}%",
                outcome.failure_rate() * 100.0,
                self.options.failure_threshold * 100.0
            );
            return Err(TranslateError::QualityThresholdExceeded { failed, total });
        }

        let text = outcome.into_text();
        info!("Completed: {} chars of translated text", text.chars().count());
        Ok(text)
    }

    /// Run the per-chunk loop without applying the quality gate.
    pub async fn translate_outcome(
        &self,
        text: &str,
        source: Language,
        target: Language,
        cancel: &CancellationToken,
    ) -> TranslateResult<TranslationOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            warn!("Rejected: nothing to translate");
            return Err(TranslateError::EmptyInput);
        }

        if source == target {
            debug!("Source and target are both {}, returning input", source);
            return Ok(TranslationOutcome {
                results: vec![ChunkResult {
                    chunk_index: 0,
                    status: ChunkStatus::Translated(trimmed.to_string()),
                }],
            });
        }

        let chunks = chunker::chunk(trimmed, self.options.max_chunk_size);
        let total = chunks.len();
        info!(
            "Chunking: {} chars into {} chunks ({} -> {})",
            trimmed.chars().count(),
            total,
            source,
            target
        );

        let mut results = Vec::with_capacity(total);
        for chunk in &chunks {
            if cancel.is_cancelled() {
                return Err(cancelled(results.len(), total));
            }

            let delay = self.options.pacing.delay_before_chunk(chunk.index);
            if !delay.is_zero() {
                debug!("Pacing {:?} before chunk {}/{}", delay, chunk.index + 1, total);
                tokio::select! {
                    _ = cancel.cancelled() => return Err(cancelled(results.len(), total)),
                    _ = sleep(delay) => {}
                }
            }

            let status = match self
                .translator
                .translate_chunk(&chunk.text, source, target)
                .await
            {
                Ok(translated) => {
                    debug!("Chunk {}/{} translated", chunk.index + 1, total);
                    ChunkStatus::Translated(translated)
                }
                Err(e) => {
                    warn!("Chunk {}/{} failed: {}", chunk.index + 1, total, e);
                    ChunkStatus::Failed {
                        placeholder: failure_placeholder(chunk),
                        error: e.to_string(),
                    }
                }
            };

            results.push(ChunkResult {
                chunk_index: chunk.index,
                status,
            });
        }

        Ok(TranslationOutcome { results })
    }
}

fn cancelled(completed: usize, total: usize) -> TranslateError {
    info!("Cancelled after {}/{} chunks", completed, total);
    TranslateError::Cancelled { completed, total }
}
