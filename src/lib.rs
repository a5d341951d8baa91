pub mod chunker;
pub mod config;
pub mod document;
pub mod error;
pub mod i18n;
pub mod pipeline;
pub mod providers;
pub mod retry;
pub mod security;
pub mod server;

pub use error::{ProviderError, TranslateError};
pub use i18n::Language;
pub use pipeline::{TranslationMode, TranslationPipeline};
