use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::http::{build_client, endpoint_url, expect_count, send_json};
use super::{Provider, TranslationResult};
use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;

const PROVIDER_NAME: &str = "bing";
const DEFAULT_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com";
const DEFAULT_REGION: &str = "global";

/// Microsoft Azure Translator (v3) client
#[derive(Debug)]
pub struct BingTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Subscription key
    api_key: String,
    /// Subscription region
    region: String,
    /// API endpoint URL
    endpoint: String,
}

/// One input element of the request body
#[derive(Debug, Serialize)]
pub struct BingText<'a> {
    /// Text to translate
    pub text: &'a str,
}

/// One element of the response array, matching one input
#[derive(Debug, Deserialize)]
pub struct BingItem {
    /// Present when the source language was auto-detected
    #[serde(rename = "detectedLanguage", default)]
    pub detected_language: Option<BingDetectedLanguage>,
    /// Translations, one per requested target
    pub translations: Vec<BingTranslation>,
}

/// Auto-detection outcome
#[derive(Debug, Deserialize)]
pub struct BingDetectedLanguage {
    /// Detected language code
    pub language: String,
}

/// A single translation
#[derive(Debug, Deserialize)]
pub struct BingTranslation {
    /// Translated text
    pub text: String,
}

impl BingTranslate {
    /// Create a new Azure Translator client
    pub fn new(
        api_key: impl Into<String>,
        region: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: build_client(timeout_secs),
            api_key: api_key.into(),
            region: region.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Registry constructor
    pub fn from_config(config: &ProviderConfig) -> Result<Box<dyn Provider>, ProviderError> {
        let api_key = config.resolved_api_key();
        if api_key.is_empty() {
            return Err(ProviderError::MissingConfiguration {
                provider: PROVIDER_NAME.to_string(),
                field: "api_key".to_string(),
            });
        }
        let region = config.region.clone().unwrap_or_else(|| DEFAULT_REGION.to_string());
        Ok(Box::new(Self::new(
            api_key,
            region,
            config.endpoint_or(DEFAULT_ENDPOINT),
            config.timeout_secs,
        )))
    }

    /// Request URL for the given language pair
    fn request_url(&self, target_language: &str, source_language: Option<&str>) -> Result<Url, ProviderError> {
        let mut query = vec![("api-version", "3.0"), ("to", target_language)];
        if let Some(source) = source_language {
            query.push(("from", source));
        }
        endpoint_url(&self.endpoint, "translate", &query)
    }

    /// Send one request for all texts
    async fn send(&self, url: Url, texts: &[String]) -> Result<Vec<BingItem>, ProviderError> {
        let body: Vec<BingText> = texts.iter().map(|text| BingText { text: text.as_str() }).collect();
        let request = self
            .client
            .post(url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .json(&body);

        let items: Vec<BingItem> = send_json(PROVIDER_NAME, request).await?;
        expect_count(items, texts.len())
    }

    /// Turn vendor items into results, paired positionally with the inputs
    pub fn into_results(
        texts: &[String],
        items: Vec<BingItem>,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        texts
            .iter()
            .zip(items)
            .map(|(text, item)| {
                let translated = item
                    .translations
                    .into_iter()
                    .next()
                    .ok_or_else(|| ProviderError::ParseError("item without translations".to_string()))?;
                let detected = item
                    .detected_language
                    .map(|d| d.language)
                    .or_else(|| source_language.map(str::to_string))
                    .unwrap_or_default();
                Ok(TranslationResult::success(
                    text.as_str(),
                    translated.text,
                    detected,
                    target_language,
                    PROVIDER_NAME,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl Provider for BingTranslate {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn translate(&self, text: &str, target_language: &str, source_language: Option<&str>) -> TranslationResult {
        let texts = [text.to_string()];
        let outcome = match self.request_url(target_language, source_language) {
            Ok(url) => match self.send(url, &texts).await {
                Ok(items) => Self::into_results(&texts, items, target_language, source_language),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match outcome.map(|mut results| results.pop()) {
            Ok(Some(result)) => result,
            Ok(None) => {
                let e = ProviderError::ParseError("empty response".to_string());
                TranslationResult::passthrough(text, target_language, PROVIDER_NAME, &e)
            }
            Err(e) => {
                error!("Bing Translate error: {}", e);
                TranslationResult::passthrough(text, target_language, PROVIDER_NAME, &e)
            }
        }
    }

    async fn batch_translate(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.request_url(target_language, source_language)?;
        let outcome = match self.send(url, texts).await {
            Ok(items) => Self::into_results(texts, items, target_language, source_language),
            Err(e) => Err(e),
        };

        Ok(outcome.unwrap_or_else(|e| {
            error!("Bing Translate batch error: {}", e);
            TranslationResult::passthrough_all(texts, target_language, PROVIDER_NAME, &e)
        }))
    }
}
