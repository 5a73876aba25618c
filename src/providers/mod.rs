/*!
 * Provider implementations for different translation services.
 *
 * Every backend implements the [`Provider`] capability trait and is
 * selected at runtime by name through the [`registry::ProviderRegistry`]:
 * - `google`: Google Cloud Translation v2
 * - `bing`: Microsoft Azure Translator v3
 * - `yandex`: Yandex Cloud Translate v2
 * - `openai`: OpenAI chat completions
 * - `gemini`: Google Gemini generateContent
 * - `deepseek`: DeepSeek (OpenAI-compatible) chat completions
 */

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

use crate::errors::ProviderError;

pub mod bing;
pub mod chat;
pub mod gemini;
pub mod google;
pub mod http;
pub mod mock;
pub mod openai;
pub mod registry;
pub mod yandex;

pub use registry::{ProviderFactory, ProviderRegistry};

/// Metadata key holding the provider name
pub const META_PROVIDER: &str = "provider";
/// Metadata key holding the model name
pub const META_MODEL: &str = "model";
/// Metadata key holding the failure detail
pub const META_ERROR: &str = "error";

/// Registry keys of the built-in providers, in registration order
pub const BUILTIN_PROVIDERS: [&str; 6] = ["google", "bing", "yandex", "openai", "gemini", "deepseek"];

/// Outcome of translating one text unit
///
/// On failure `translated_text` equals `original_text` and the
/// `error` metadata key carries the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    /// Text as sent to the provider
    pub original_text: String,
    /// Translation, or the original text on failure
    pub translated_text: String,
    /// Detected or requested source language; empty if unknown
    pub source_language: String,
    /// Requested target language
    pub target_language: String,
    /// Diagnostics: provider, model, error
    pub metadata: BTreeMap<String, String>,
}

impl TranslationResult {
    /// A successful translation
    pub fn success(
        original_text: impl Into<String>,
        translated_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        provider: &str,
    ) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(META_PROVIDER.to_string(), provider.to_string());
        Self {
            original_text: original_text.into(),
            translated_text: translated_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            metadata,
        }
    }

    /// A failed translation that passes the original text through
    pub fn passthrough(
        original_text: impl Into<String>,
        target_language: impl Into<String>,
        provider: &str,
        error: &dyn Display,
    ) -> Self {
        let original_text = original_text.into();
        let mut metadata = BTreeMap::new();
        metadata.insert(META_PROVIDER.to_string(), provider.to_string());
        metadata.insert(META_ERROR.to_string(), error.to_string());
        Self {
            translated_text: original_text.clone(),
            original_text,
            source_language: String::new(),
            target_language: target_language.into(),
            metadata,
        }
    }

    /// Passthrough results for a whole batch sharing one failure
    pub fn passthrough_all(
        texts: &[String],
        target_language: &str,
        provider: &str,
        error: &dyn Display,
    ) -> Vec<Self> {
        texts
            .iter()
            .map(|text| Self::passthrough(text.as_str(), target_language, provider, error))
            .collect()
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// True if this result carries a failure
    pub fn is_passthrough(&self) -> bool {
        self.metadata.contains_key(META_ERROR)
    }

    /// Failure detail, if any
    pub fn error(&self) -> Option<&str> {
        self.metadata.get(META_ERROR).map(String::as_str)
    }

    /// Provider name recorded in the metadata
    pub fn provider(&self) -> Option<&str> {
        self.metadata.get(META_PROVIDER).map(String::as_str)
    }
}

/// Common trait for all translation providers
///
/// Implementations never fail for an individual text: network and
/// response errors are turned into passthrough results. `batch_translate`
/// may return an error only when the call cannot be attempted at all
/// (for instance a request that cannot be built).
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Registry key of this provider
    fn name(&self) -> &str;

    /// Translate a single text
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `target_language` - Target language code
    /// * `source_language` - Source language code, `None` to auto-detect
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: Option<&str>,
    ) -> TranslationResult;

    /// Translate many texts, returning one result per text in input order
    ///
    /// The default calls `translate` once per text, sequentially.
    async fn batch_translate(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text, target_language, source_language).await);
        }
        Ok(results)
    }
}

/// Register the built-in providers in their canonical order
pub fn register_builtin_providers(registry: &mut ProviderRegistry) {
    registry.register("google", google::GoogleTranslate::from_config);
    registry.register("bing", bing::BingTranslate::from_config);
    registry.register("yandex", yandex::YandexTranslate::from_config);
    registry.register("openai", openai::OpenAI::openai_from_config);
    registry.register("gemini", gemini::Gemini::from_config);
    registry.register("deepseek", openai::OpenAI::deepseek_from_config);
}
