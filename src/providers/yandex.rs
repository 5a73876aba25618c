use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::http::{build_client, endpoint_url, expect_count, send_json};
use super::{Provider, TranslationResult};
use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;

const PROVIDER_NAME: &str = "yandex";
const DEFAULT_ENDPOINT: &str = "https://translate.api.cloud.yandex.net/translate/v2";

/// Yandex Cloud Translate (v2) client
#[derive(Debug)]
pub struct YandexTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key, sent as `Authorization: Api-Key ...`
    api_key: String,
    /// Cloud folder, required for user accounts
    folder_id: Option<String>,
    /// API endpoint URL
    endpoint: String,
}

/// Translate request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexRequest<'a> {
    /// Texts to translate
    texts: &'a [String],
    /// Target language
    target_language_code: &'a str,
    /// Source language, omitted to auto-detect
    #[serde(skip_serializing_if = "Option::is_none")]
    source_language_code: Option<&'a str>,
    /// Cloud folder
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_id: Option<&'a str>,
}

/// Translate response
#[derive(Debug, Deserialize)]
pub struct YandexResponse {
    /// One translation per input text
    pub translations: Vec<YandexTranslation>,
}

/// A single translation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexTranslation {
    /// Translated text
    pub text: String,
    /// Language detected when no source was given
    #[serde(default)]
    pub detected_language_code: Option<String>,
}

impl YandexTranslate {
    /// Create a new Yandex Translate client
    pub fn new(
        api_key: impl Into<String>,
        folder_id: Option<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: build_client(timeout_secs),
            api_key: api_key.into(),
            folder_id,
            endpoint: endpoint.into(),
        }
    }

    /// Registry constructor; `extra.folder_id` selects the cloud folder
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
            config.extra("folder_id").map(str::to_string),
            config.endpoint_or(DEFAULT_ENDPOINT),
            config.timeout_secs,
        )))
    }

    /// Send one request for all texts
    async fn send(
        &self,
        url: Url,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<YandexTranslation>, ProviderError> {
        let body = YandexRequest {
            texts,
            target_language_code: target_language,
            source_language_code: source_language,
            folder_id: self.folder_id.as_deref(),
        };
        let request = self
            .client
            .post(url)
            .header("Authorization", format!("Api-Key {}", self.api_key))
            .json(&body);

        let response: YandexResponse = send_json(PROVIDER_NAME, request).await?;
        expect_count(response.translations, texts.len())
    }

    /// Turn vendor translations into results, paired positionally with the inputs
    pub fn into_results(
        texts: &[String],
        translations: Vec<YandexTranslation>,
        target_language: &str,
        source_language: Option<&str>,
    ) -> Vec<TranslationResult> {
        texts
            .iter()
            .zip(translations)
            .map(|(text, translation)| {
                let detected = translation
                    .detected_language_code
                    .or_else(|| source_language.map(str::to_string))
                    .unwrap_or_default();
                TranslationResult::success(text.as_str(), translation.text, detected, target_language, PROVIDER_NAME)
            })
            .collect()
    }
}

#[async_trait]
impl Provider for YandexTranslate {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn translate(&self, text: &str, target_language: &str, source_language: Option<&str>) -> TranslationResult {
        let texts = [text.to_string()];
        let sent = match endpoint_url(&self.endpoint, "translate", &[]) {
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
                error!("Yandex Translate error: {}", e);
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

        let url = endpoint_url(&self.endpoint, "translate", &[])?;
        match self.send(url, texts, target_language, source_language).await {
            Ok(translations) => Ok(Self::into_results(texts, translations, target_language, source_language)),
            Err(e) => {
                error!("Yandex Translate batch error: {}", e);
                Ok(TranslationResult::passthrough_all(texts, target_language, PROVIDER_NAME, &e))
            }
        }
    }
}
