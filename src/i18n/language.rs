//! Language type: validated language representation.

use crate::error::TranslateError;
use crate::i18n::{LanguageConfig, LanguageRegistry};
use std::fmt;
use std::str::FromStr;

/// A validated language.
///
/// Only languages present in the registry can be constructed, so
/// everything downstream can rely on `config()` succeeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "bs")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const BOSNIAN: Language = Language { code: "bs" };
    pub const CHINESE: Language = Language { code: "zh" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is registered
    /// * `Err(TranslateError::UnsupportedLanguage)` otherwise
    ///
    /// # Example
    /// ```ignore
    /// let bosnian = Language::from_code("bs")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Language, TranslateError> {
        match LanguageRegistry::get().get_by_code(code.trim()) {
            Some(config) => Ok(Language { code: config.code }),
            None => Err(TranslateError::UnsupportedLanguage(code.to_string())),
        }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a `Language` built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Code understood by the translation backends (e.g., "zh-CN").
    pub fn provider_code(&self) -> &'static str {
        self.config().provider_code
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl FromStr for Language {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}
