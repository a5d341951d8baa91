//! Document text extraction.
//!
//! Extractors are handed to whoever loads documents (the CLI, the server)
//! and never to the pipeline, which only ever sees plain text.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No extractor supports '{0}'")]
    Unsupported(String),

    #[error("Document is not valid UTF-8 text: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns the bytes of one document format into plain text.
pub trait DocumentTextExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this extractor handles files like `path`.
    fn supports(&self, path: &Path) -> bool;

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// UTF-8 text and markdown files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    const EXTENSIONS: &'static [&'static str] = &["txt", "text", "md", "markdown"];
}

impl DocumentTextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn supports(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext)),
            None => true,
        }
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = String::from_utf8(bytes.to_vec())?;
        Ok(text.replace("\r\n", "\n"))
    }
}

/// Ordered set of extractors; the first one supporting a path wins.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn DocumentTextExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn DocumentTextExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn find(&self, path: &Path) -> Option<&dyn DocumentTextExtractor> {
        self.extractors
            .iter()
            .find(|e| e.supports(path))
            .map(|e| &**e)
    }

    /// Read `path` and extract its text.
    pub fn extract_file(&self, path: &Path) -> Result<String, ExtractError> {
        let extractor = self
            .find(path)
            .ok_or_else(|| ExtractError::Unsupported(path.display().to_string()))?;
        let bytes = std::fs::read(path)?;
        extractor.extract(&bytes)
    }
}

impl Default for ExtractorRegistry {
    /// Plain text only. PDF, DOCX and spreadsheet extractors plug in here.
    fn default() -> Self {
        Self::new().with_extractor(Box::new(PlainTextExtractor))
    }
}
