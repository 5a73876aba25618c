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

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/v1";
const DEEPSEEK_MODEL: &str = "deepseek-chat";
const TEMPERATURE: f32 = 0.3;

/// Client for OpenAI-compatible chat completion APIs
///
/// Serves both the `openai` and `deepseek` registry keys; they differ only
/// in endpoint and default model.
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// Registry key this instance was created under
    provider_name: &'static str,
    /// Bearer token
    api_key: String,
    /// API base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Chat model
    model: String,
    /// Send whole batches as one prompt
    merge: bool,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Completion choices
    pub choices: Vec<OpenAIChoice>,
    /// Token usage, not reported by every compatible server
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: OpenAIMessage,
}

impl OpenAIRequest {
    /// Create a new request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl OpenAI {
    /// Create a new client
    pub fn new(
        provider_name: &'static str,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        merge: bool,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: build_client(timeout_secs),
            provider_name,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            merge,
        }
    }

    fn from_config_with(
        provider_name: &'static str,
        default_endpoint: &str,
        default_model: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn Provider>, ProviderError> {
        let api_key = config.resolved_api_key();
        if api_key.is_empty() {
            return Err(ProviderError::MissingConfiguration {
                provider: provider_name.to_string(),
                field: "api_key".to_string(),
            });
        }
        Ok(Box::new(Self::new(
            provider_name,
            api_key,
            config.endpoint_or(default_endpoint),
            config.model_or(default_model),
            config.merge,
            config.timeout_secs,
        )))
    }

    /// Registry constructor for `openai`
    pub fn openai_from_config(config: &ProviderConfig) -> Result<Box<dyn Provider>, ProviderError> {
        Self::from_config_with("openai", OPENAI_ENDPOINT, OPENAI_MODEL, config)
    }

    /// Registry constructor for `deepseek`
    pub fn deepseek_from_config(config: &ProviderConfig) -> Result<Box<dyn Provider>, ProviderError> {
        Self::from_config_with("deepseek", DEEPSEEK_ENDPOINT, DEEPSEEK_MODEL, config)
    }

    /// Send a chat completion request
    pub async fn send(&self, url: Url, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let request = self.client.post(url).bearer_auth(&self.api_key).json(request);
        send_json(self.provider_name, request).await
    }

    /// Extract the reply text from a response
    pub fn extract_text(response: &OpenAIResponse) -> Result<String, ProviderError> {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| ProviderError::ParseError("no choices in completion".to_string()))
    }
}

#[async_trait]
impl ChatCompletion for OpenAI {
    fn provider_name(&self) -> &str {
        self.provider_name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn merge(&self) -> bool {
        self.merge
    }

    fn completion_url(&self) -> Result<Url, ProviderError> {
        endpoint_url(&self.endpoint, "chat/completions", &[])
    }

    async fn complete(&self, url: Url, system: &str, user: &str) -> Result<String, ProviderError> {
        let request = OpenAIRequest::new(self.model.as_str())
            .add_message("system", system)
            .add_message("user", user)
            .temperature(TEMPERATURE);

        let response = self.send(url, &request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                "{} usage: {} prompt tokens, {} completion tokens",
                self.provider_name, usage.prompt_tokens, usage.completion_tokens
            );
        }
        Self::extract_text(&response)
    }
}

#[async_trait]
impl Provider for OpenAI {
    fn name(&self) -> &str {
        self.provider_name
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
