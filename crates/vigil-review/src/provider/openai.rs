use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vigil_core::{BackendConfig, VigilError};

use super::{http_client, require_key, Provider};
use crate::prompt::build_system_prompt;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

fn extract_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
}

/// OpenAI chat-completions backend.
///
/// Sends a system + user message pair with temperature 0 and reads the
/// answer from `choices[0].message.content`.
#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Build the backend from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] when no API key is configured, or
    /// [`VigilError::Provider`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, VigilError> {
        let api_key = require_key(config.api_key.as_deref(), "OPENAI_API_KEY")?;
        Ok(Self {
            client: http_client()?,
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn invoke(&self, prompt: &str) -> Result<String, VigilError> {
        let system = build_system_prompt();
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| VigilError::Provider(format!("OpenAI request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(VigilError::Provider(format!(
                "OpenAI API error {status}: {body_text}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| VigilError::Provider(format!("failed to parse OpenAI response: {e}")))?;

        extract_content(parsed)
            .ok_or_else(|| VigilError::Provider("OpenAI response had no message content".into()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_requires_api_key() {
        let config = BackendConfig {
            model: "gpt-4-turbo-preview".into(),
            api_key: None,
        };
        let err = OpenAiProvider::new(&config).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4-turbo-preview",
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: "review this",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4-turbo-preview");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "review this");
    }

    #[test]
    fn extracts_first_choice_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"{\"summary\":\"ok\",\"findings\":[]}"}}]}"#,
        )
        .unwrap();
        let content = extract_content(response).unwrap();
        assert!(content.contains("summary"));
    }

    #[test]
    fn missing_content_yields_none() {
        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_content(empty).is_none());

        let null_content: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(extract_content(null_content).is_none());
    }
}
