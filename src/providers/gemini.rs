use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::chat::{self, ChatCompletion};
use super::http::{build_client, endpoint_url, send_json};
use super::{Provider, TranslationResult};
use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;

const PROVIDER_NAME: &str = "gemini";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const TEMPERATURE: f32 = 0.3;

/// Google Gemini client (generateContent)
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key, sent as `x-goog-api-key`
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Model name
    model: String,
    /// Send whole batches as one prompt
    merge: bool,
}

/// generateContent request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns
    contents: Vec<GeminiContent>,

    /// Instruction applied to the whole conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,

    /// Sampling settings
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One content block
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Author role (user, model); absent for system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Text parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Part text
    #[serde(default)]
    pub text: String,
}

/// Sampling settings
#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    /// Temperature for generation
    pub temperature: f32,
}

/// generateContent response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Token accounting
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// A generated candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// Candidate content; missing when generation was blocked
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Tokens in the candidates
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GeminiContent {
    /// Content with a single text part
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart { text: text.into() }],
        }
    }
}

impl GeminiRequest {
    /// Create a request with one user turn
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent::text(Some("user"), user)],
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Set the system instruction
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(GeminiContent::text(None, system));
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GenerationConfig { temperature });
        self
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        merge: bool,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: build_client(timeout_secs),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            merge,
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
            config.model_or(DEFAULT_MODEL),
            config.merge,
            config.timeout_secs,
        )))
    }

    /// Concatenated text of the first candidate
    pub fn extract_text(response: &GeminiResponse) -> Result<String, ProviderError> {
        let content = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .ok_or_else(|| ProviderError::ParseError("no candidates in response".to_string()))?;

        Ok(content.parts.iter().map(|part| part.text.as_str()).collect())
    }
}

#[async_trait]
impl ChatCompletion for Gemini {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn merge(&self) -> bool {
        self.merge
    }

    fn completion_url(&self) -> Result<Url, ProviderError> {
        endpoint_url(&self.endpoint, &format!("models/{}:generateContent", self.model), &[])
    }

    async fn complete(&self, url: Url, system: &str, user: &str) -> Result<String, ProviderError> {
        let request = GeminiRequest::new(user).system(system).temperature(TEMPERATURE);
        let request = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request);

        let response: GeminiResponse = send_json(PROVIDER_NAME, request).await?;
        if let Some(usage) = &response.usage_metadata {
            debug!(
                "gemini usage: {} prompt tokens, {} candidate tokens",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }
        Self::extract_text(&response)
    }
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn translate(&self, text: &str, target_language: &str, source_language: Option<&str>) -> TranslationResult {
        chat::translate_one(self, text, target_language, source_language).await
    }

    async fn batch_translate(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        chat::translate_batch(self, texts, target_language, source_language).await
    }
}
