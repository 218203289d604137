use async_trait::async_trait;
use mentor_rust::{Error, Result, llm::ChatMessage, llm::LlmClient};
use std::sync::{Arc, Mutex};

/// Mock LLM client for testing
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<String>>>,
    pub requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    pub error: Option<String>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_responses(self, responses: Vec<&str>) -> Self {
        *self.responses.lock().unwrap() = responses.into_iter().map(String::from).collect();
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn get_requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.requests.lock().unwrap().push(messages);

        if let Some(ref error) = self.error {
            return Err(Error::llm(error.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::llm("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}
