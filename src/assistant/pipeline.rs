use crate::{
    Error, Result,
    config::LlmConfig,
    llm::{ChatMessage, ContentPart, ImageDetail, LlmClient, OpenAiClient},
    prompt::{
        ChatPromptTemplate, DEFAULT_IMAGE_PROMPT, HUMAN_TEMPLATE, IMAGE_ANALYSIS_TEMPLATE,
        PROMPT_VARIABLE, PromptTemplate, QUESTION_VARIABLE, image_data_uri,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub const MISSING_IMAGE_MESSAGE: &str = "画像データが提供されていません";

/// Assembles prompts for both endpoints and hands them to the model client.
pub struct Assistant {
    llm_client: Arc<dyn LlmClient>,
    chat_prompt: ChatPromptTemplate,
    analysis_prompt: PromptTemplate,
}

impl Assistant {
    pub fn new(llm_config: &LlmConfig) -> Result<Self> {
        info!(
            "Initializing assistant with provider '{}' and model '{}'",
            llm_config.provider, llm_config.model
        );
        let llm_client = Arc::new(OpenAiClient::new(llm_config.clone()));
        Self::with_client(llm_client, llm_config.system_prompt())
    }

    /// Builds an assistant around any client. Fails when the system prompt
    /// contains placeholders other than `{question}`.
    pub fn with_client(llm_client: Arc<dyn LlmClient>, system_prompt: &str) -> Result<Self> {
        let chat_prompt = ChatPromptTemplate::from_messages([
            ("system", system_prompt),
            ("human", HUMAN_TEMPLATE),
        ])
        .map_err(|e| Error::config(format!("Invalid system prompt: {e}")))?;

        if let Some(unknown) = chat_prompt
            .input_variables()
            .into_iter()
            .find(|name| *name != QUESTION_VARIABLE)
        {
            return Err(Error::config(format!(
                "System prompt references unknown template variable '{unknown}'"
            )));
        }

        Ok(Self {
            llm_client,
            chat_prompt,
            analysis_prompt: PromptTemplate::parse(IMAGE_ANALYSIS_TEMPLATE)?,
        })
    }

    pub fn chat_messages(&self, user_message: &str) -> Result<Vec<ChatMessage>> {
        let variables = HashMap::from([(QUESTION_VARIABLE, user_message)]);
        self.chat_prompt.format_messages(&variables)
    }

    /// A single user message holding the analysis instruction and the image.
    pub fn image_messages(&self, image: &str, prompt: Option<&str>) -> Result<Vec<ChatMessage>> {
        if image.is_empty() {
            return Err(Error::validation(MISSING_IMAGE_MESSAGE));
        }

        let prompt = prompt.unwrap_or(DEFAULT_IMAGE_PROMPT);
        let instruction = self
            .analysis_prompt
            .format(&HashMap::from([(PROMPT_VARIABLE, prompt)]))?;

        Ok(vec![ChatMessage::user_parts(vec![
            ContentPart::Text(instruction),
            ContentPart::image_url(image_data_uri(image), ImageDetail::High),
        ])])
    }

    pub async fn chat(&self, user_message: &str) -> Result<String> {
        let messages = self.chat_messages(user_message)?;
        debug!("Sending chat prompt with {} messages", messages.len());
        self.llm_client.generate(messages).await
    }

    pub async fn analyze_image(&self, image: &str, prompt: Option<&str>) -> Result<String> {
        let messages = self.image_messages(image, prompt)?;
        debug!("Sending image analysis prompt ({} base64 bytes)", image.len());
        self.llm_client.generate(messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MessageContent, MockLlmClient};
    use crate::prompt::SYSTEM_PROMPT;
    use pretty_assertions::assert_eq;

    fn assistant_with(mock: MockLlmClient) -> Assistant {
        Assistant::with_client(Arc::new(mock), SYSTEM_PROMPT).unwrap()
    }

    #[tokio::test]
    async fn chat_sends_system_and_human_messages() {
        let mut mock = MockLlmClient::new();
        mock.expect_generate()
            .withf(|messages| {
                messages.len() == 2
                    && messages[0] == ChatMessage::system(SYSTEM_PROMPT)
                    && messages[1] == ChatMessage::user("Pythonとは？")
            })
            .times(1)
            .returning(|_| Ok("・汎用プログラミング言語です".to_string()));

        let reply = assistant_with(mock).chat("Pythonとは？").await.unwrap();
        assert_eq!(reply, "・汎用プログラミング言語です");
    }

    #[tokio::test]
    async fn chat_accepts_empty_message() {
        let mut mock = MockLlmClient::new();
        mock.expect_generate()
            .withf(|messages| messages[1] == ChatMessage::user(""))
            .times(1)
            .returning(|_| Ok(String::new()));

        let reply = assistant_with(mock).chat("").await.unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn empty_image_never_reaches_the_model() {
        let mut mock = MockLlmClient::new();
        mock.expect_generate().times(0);

        let err = assistant_with(mock)
            .analyze_image("", Some("x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_IMAGE_MESSAGE);
    }

    #[test]
    fn image_message_uses_default_prompt_and_high_detail() {
        let assistant = assistant_with(MockLlmClient::new());
        let messages = assistant.image_messages("aGVsbG8=", None).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        let MessageContent::Parts(parts) = &messages[0].content else {
            panic!("expected multi-part content");
        };
        assert_eq!(
            parts[0],
            ContentPart::Text(IMAGE_ANALYSIS_TEMPLATE.replace("{prompt}", DEFAULT_IMAGE_PROMPT))
        );
        assert_eq!(
            parts[1],
            ContentPart::image_url("data:image/jpeg;base64,aGVsbG8=", ImageDetail::High)
        );
    }

    #[test]
    fn image_message_keeps_explicit_empty_prompt() {
        let assistant = assistant_with(MockLlmClient::new());
        let messages = assistant.image_messages("aGVsbG8=", Some("")).unwrap();
        let text = messages[0].text_content();
        assert!(!text.contains(DEFAULT_IMAGE_PROMPT));
        assert!(text.contains("1. 画像の概要"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let mut mock = MockLlmClient::new();
        mock.expect_generate()
            .returning(|_| Err(Error::llm("quota exceeded")));

        let err = assistant_with(mock)
            .analyze_image("aGVsbG8=", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "LLM error: quota exceeded");
    }

    #[test]
    fn system_prompt_with_stray_placeholder_is_rejected() {
        let result = Assistant::with_client(Arc::new(MockLlmClient::new()), "Hi {name}");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn system_prompt_with_escaped_braces_is_accepted() {
        let assistant =
            Assistant::with_client(Arc::new(MockLlmClient::new()), "Use {{braces}}").unwrap();
        let messages = assistant.chat_messages("q").unwrap();
        assert_eq!(messages[0], ChatMessage::system("Use {braces}"));
    }
}
