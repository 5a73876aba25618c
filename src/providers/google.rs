use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::http::{build_client, endpoint_url, expect_count, send_json};
use super::{Provider, TranslationResult};
use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;

const PROVIDER_NAME: &str = "google";
const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Cloud Translation (v2 REST) client
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key, sent as the `key` query parameter
    api_key: String,
    /// API endpoint URL
    endpoint: String,
}

/// Translate request body
#[derive(Debug, Serialize)]
pub struct GoogleRequest<'a> {
    /// Texts to translate
    q: &'a [String],
    /// Target language
    target: &'a str,
    /// Source language, omitted to auto-detect
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    /// Plain text, so the reply is not HTML-escaped
    format: &'static str,
}

/// Translate response
#[derive(Debug, Deserialize)]
pub struct GoogleResponse {
    /// Response payload
    pub data: GoogleData,
}

/// Response payload
#[derive(Debug, Deserialize)]
pub struct GoogleData {
    /// One translation per input text
    pub translations: Vec<GoogleTranslation>,
}

/// A single translation
#[derive(Debug, Deserialize)]
pub struct GoogleTranslation {
    /// Translated text
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    /// Language detected when no source was given
    #[serde(rename = "detectedSourceLanguage", default)]
    pub detected_source_language: Option<String>,
}

impl GoogleTranslate {
    /// Create a new Google Translate client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: build_client(timeout_secs),
            api_key: api_key.into(),
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
        Ok(Box::new(Self::new(
            api_key,
            config.endpoint_or(DEFAULT_ENDPOINT),
            config.timeout_secs,
        )))
    }

    /// Request URL carrying the API key
    fn request_url(&self) -> Result<Url, ProviderError> {
        endpoint_url(&self.endpoint, "", &[("key", self.api_key.as_str())])
    }

    /// Send one request for all texts
    async fn send(
        &self,
        url: Url,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<GoogleTranslation>, ProviderError> {
        let body = GoogleRequest {
            q: texts,
            target: target_language,
            source: source_language,
            format: "text",
        };

        let response: GoogleResponse = send_json(PROVIDER_NAME, self.client.post(url).json(&body)).await?;
        expect_count(response.data.translations, texts.len())
    }

    /// Turn vendor translations into results, paired positionally with the inputs
    pub fn into_results(
        texts: &[String],
        translations: Vec<GoogleTranslation>,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Vec<TranslationResult> {
        texts
            .iter()
            .zip(translations)
            .map(|(text, translation)| {
                let detected = translation
                    .detected_source_language
                    .or_else(|| source_language.map(str::to_string))
                    .unwrap_or_default();
                TranslationResult::success(
                    text.as_str(),
                    translation.translated_text,
                    detected,
                    target_language,
                    PROVIDER_NAME,
                )
            })
            .collect()
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn translate(&self, text: &str, target_language: &str, source_language: Option<&str>) -> TranslationResult {
        let texts = [text.to_string()];
        let sent = match self.request_url() {
            Ok(url) => self.send(url, &texts, target_language, source_language).await,
            Err(e) => Err(e),
        };
        match sent {
            Ok(translations) => Self::into_results(&texts, translations, target_language, source_language)
                .pop()
                .unwrap_or_else(|| {
                    let e = ProviderError::ParseError("empty translation list".to_string());
                    TranslationResult::passthrough(text, target_language, PROVIDER_NAME, &e)
                }),
            Err(e) => {
                error!("Google Translate error: {}", e);
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

        let url = self.request_url()?;
        match self.send(url, texts, target_language, source_language).await {
            Ok(translations) => Ok(Self::into_results(texts, translations, target_language, source_language)),
            Err(e) => {
                error!("Google Translate batch error: {}", e);
                Ok(TranslationResult::passthrough_all(texts, target_language, PROVIDER_NAME, &e))
            }
        }
    }
}
