use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::Message,
};

/// A hosted chat model: ordered messages in, one assistant reply out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> AppResult<String>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions (Groq by default).
#[derive(Clone)]
pub struct OpenAiChatModel {
    client: Result<Client<OpenAIConfig>, AppError>,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiChatModel {
    /// Missing credentials are not fatal here; they surface on the first call.
    pub fn new(config: &Config) -> Self {
        let client = config.model_api_key().map(|key| {
            Client::with_config(
                OpenAIConfig::new()
                    .with_api_base(config.llm_api_base.clone())
                    .with_api_key(key.expose_secret()),
            )
        });

        Self {
            client,
            model: config.llm_model.clone(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, messages: &[Message]) -> AppResult<String> {
        let client = self.client.as_ref().map_err(Clone::clone)?;

        log::debug!(
            "Requesting completion from '{}' with {} messages",
            self.model,
            messages.len()
        );

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };
        let response: ChatCompletionResponse = client.chat().create_byot(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| AppError::Upstream("Model returned no choices".to_string()))
    }
}
