use crate::{Error, Result, prompt::SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Empty means the provider's public endpoint.
    #[serde(default)]
    pub base_url: String,
    /// Empty means the client falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Host name of the deployment, without scheme.
    #[serde(default)]
    pub deployment_url: Option<String>,
    #[serde(default = "default_service_policy")]
    pub service: CorsPolicy,
    #[serde(default = "default_functions_policy")]
    pub functions: CorsPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsPolicy {
    Any,
    AllowList,
}

impl LlmConfig {
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT)
    }
}

impl CorsConfig {
    /// Allow list including the origins derived from the deployment URL.
    pub fn origins(&self) -> Vec<String> {
        let mut origins = self.allowed_origins.clone();
        if let Some(url) = self.deployment_url.as_deref().filter(|url| !url.is_empty()) {
            origins.push(format!("https://{url}"));
            origins.push("https://*.vercel.app".to_string());
        }
        origins
    }
}

impl Config {
    /// Overlays values taken from the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = api_key;
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Some(url) = lookup("VERCEL_URL") {
            self.server.cors.deployment_url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.provider != "openai" {
            return Err(Error::config(format!(
                "Unsupported LLM provider: '{}'",
                self.llm.provider
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(Error::config("LLM model must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::config(format!(
                "LLM temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }
        if self.server.body_limit_bytes == 0 {
            return Err(Error::config("server.body_limit_bytes must be positive"));
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: String::new(),
            api_key: String::new(),
            model: default_model(),
            temperature: 0.0,
            system_prompt: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            cors: CorsConfig::default(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            deployment_url: None,
            service: default_service_policy(),
            functions: default_functions_policy(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_body_limit_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://localhost:3000".to_string(),
    ]
}

fn default_service_policy() -> CorsPolicy {
    CorsPolicy::AllowList
}

fn default_functions_policy() -> CorsPolicy {
    CorsPolicy::Any
}
