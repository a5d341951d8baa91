//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is a `OnceLock` singleton, initialised on first access and
//! immutable afterwards.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "bs", "zh")
    pub code: &'static str,

    /// Code sent to the translation backends. Both backends want a region
    /// qualifier for Chinese.
    pub provider_code: &'static str,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// Matching is case-insensitive on the ISO code only, so `"BS"` finds
    /// Bosnian but `"zh-CN"` does not.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code))
    }
}

/// Default language configurations: English, Bosnian and Chinese.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            provider_code: "en",
        },
        LanguageConfig {
            code: "bs",
            provider_code: "bs",
        },
        LanguageConfig {
            code: "zh",
            provider_code: "zh-CN",
        },
    ]
}
