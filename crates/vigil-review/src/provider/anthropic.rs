use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vigil_core::{BackendConfig, VigilError};

use super::{http_client, require_key, Provider};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

fn extract_text(response: MessagesResponse) -> Option<String> {
    response.content.into_iter().next().and_then(|b| b.text)
}

/// Anthropic Messages API backend.
///
/// Not OpenAI-compatible: authenticates with `x-api-key` plus a pinned
/// `anthropic-version` header and reads the answer from `content[0].text`.
#[derive(Debug)]
pub struct AnthropicProvider {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl AnthropicProvider {
    /// Build the backend from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] when no API key is configured, or
    /// [`VigilError::Provider`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, VigilError> {
        let api_key = require_key(config.api_key.as_deref(), "ANTHROPIC_API_KEY")?;
        Ok(Self {
            client: http_client()?,
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn invoke(&self, prompt: &str) -> Result<String, VigilError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| VigilError::Provider(format!("Anthropic request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(VigilError::Provider(format!(
                "Anthropic API error {status}: {body_text}"
            )));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            VigilError::Provider(format!("failed to parse Anthropic response: {e}"))
        })?;

        extract_text(parsed)
            .ok_or_else(|| VigilError::Provider("Anthropic response had no text content".into()))
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
