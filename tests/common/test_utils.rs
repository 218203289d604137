use super::mocks::MockLlmClient;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use mentor_rust::{
    assistant::Assistant,
    config::ServerConfig,
    prompt::SYSTEM_PROMPT,
    server::{AppState, router},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

/// Full application wired to the given mock client
pub fn create_test_app(mock: MockLlmClient) -> Router {
    create_test_app_with(mock, ServerConfig::default())
}

pub fn create_test_app_with(mock: MockLlmClient, server: ServerConfig) -> Router {
    let assistant = Assistant::with_client(Arc::new(mock), SYSTEM_PROMPT).unwrap();
    router(AppState::new(assistant), &server)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> String {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await.unwrap();
    config_path.to_string_lossy().to_string()
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8080
  logs:
    level: "debug"
  cors:
    allowed_origins:
      - "https://mentor.example.com"
    functions: "allow_list"

llm:
  provider: "openai"
  base_url: "http://localhost:4010/v1"
  api_key: "test-api-key"
  model: "gpt-4o"
  temperature: 0.2
  system_prompt: "You are a terse reviewer."
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
"#;
