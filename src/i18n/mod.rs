//! Supported languages.
//!
//! - `registry`: single source of truth for the languages the backends are
//!   asked to translate between and their provider-specific codes
//! - `language`: the validated `Language` type used everywhere else
//!
//! # Example
//!
//! ```rust,ignore
//! use bosnian_translate::i18n::Language;
//!
//! let chinese = Language::from_code("zh")?;
//! assert_eq!(chinese.provider_code(), "zh-CN");
//! ```

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
