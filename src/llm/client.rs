use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Seam for the external text-generation service.
///
/// The pipeline only needs "system prompt + user prompt in, raw text out";
/// tests swap in scripted implementations.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Temperature (0-1, low for consistent analysis)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.3,
            max_tokens: 8192,
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.3,
            max_tokens: 8192,
        }
    }
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send a message and return the raw response text
    pub async fn send_message(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(system.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error: {} - {}", status, body);
        }

        let response: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        // Extract text from the first content block
        response
            .content
            .first()
            .and_then(|c| {
                if c.content_type == "text" {
                    Some(c.text.clone())
                } else {
                    None
                }
            })
            .context("No text content in response")
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        self.send_message(system, user).await
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}
