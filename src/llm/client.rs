use super::types::ChatMessage;
use crate::{Error, Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use tracing::debug;

/// Sends a message sequence to a model and returns the completion text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        let mut openai_config = OpenAIConfig::new();

        if !config.api_key.is_empty() {
            openai_config = openai_config.with_api_key(config.api_key);
        }

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        let client = Client::with_config(openai_config);

        Self {
            client,
            model: config.model,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String> {
        debug!(
            "Creating chat completion with {} messages on model {}",
            messages.len(),
            self.model
        );

        let messages = messages
            .iter()
            .map(ChatMessage::to_openai_message)
            .collect::<Result<Vec<_>>>()?;

        let request = openai_types::CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()?;

        let response = self.client.chat().create(request).await?;

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::llm("Model returned no choices"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}
