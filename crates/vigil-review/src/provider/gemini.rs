use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vigil_core::{BackendConfig, VigilError};

use super::{http_client, require_key, Provider};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const MAX_OUTPUT_TOKENS: u32 = 4096;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn extract_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .and_then(|p| p.text)
}

/// Google Generative AI backend.
///
/// The model name is part of the URL path; auth is the `x-goog-api-key`
/// header. The answer is read from `candidates[0].content.parts[0].text`.
#[derive(Debug)]
pub struct GeminiProvider {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    /// Build the backend from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] when no API key is configured, or
    /// [`VigilError::Provider`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, VigilError> {
        let api_key = require_key(config.api_key.as_deref(), "GEMINI_API_KEY")?;
        Ok(Self {
            client: http_client()?,
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{API_BASE}/models/{}:generateContent", self.model)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn invoke(&self, prompt: &str) -> Result<String, VigilError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VigilError::Provider(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(VigilError::Provider(format!(
                "Gemini API error {status}: {body_text}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| VigilError::Provider(format!("failed to parse Gemini response: {e}")))?;

        extract_text(parsed)
            .ok_or_else(|| VigilError::Provider("Gemini response had no candidate text".into()))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_requires_api_key() {
        let config = BackendConfig {
            model: "gemini-2.0-flash".into(),
            api_key: None,
        };
        let err = GeminiProvider::new(&config).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn url_embeds_the_model() {
        let provider = GeminiProvider::new(&BackendConfig {
            model: "gemini-2.0-flash".into(),
            api_key: Some("g".into()),
        })
        .unwrap();
        assert_eq!(
            provider.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn request_body_uses_camel_case() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 4096);
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"answer"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "answer");
    }

    #[test]
    fn missing_candidates_yield_none() {
        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(extract_text(empty).is_none());
    }
}
