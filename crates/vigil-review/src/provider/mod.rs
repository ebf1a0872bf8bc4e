//! The provider gateway: one capability (send a prompt, get raw text back)
//! behind interchangeable HTTPS backends.
//!
//! Backends are selected by the configured provider name through [`create`].
//! Adding a backend means one new module and one new match arm. Every call is
//! a single best-effort attempt: no retry, no backoff.

use async_trait::async_trait;

use vigil_core::{LlmConfig, VigilError};

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Provider names accepted by [`create`].
pub const SUPPORTED: &[&str] = &["openai", "anthropic", "gemini"];

/// A remote AI text-completion backend.
///
/// Implementations build a provider-specific request embedding the prompt and
/// the configured model, send one HTTPS call, and extract the designated text
/// field from the response.
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Send the prompt and return the model's raw text answer.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Provider`] on network failure, a non-success
    /// HTTP status (the response body is included for diagnosis), or a
    /// response missing the expected content field.
    async fn invoke(&self, prompt: &str) -> Result<String, VigilError>;

    /// The backend's registry name.
    fn name(&self) -> &'static str;
}

/// Build the provider selected by `config.provider`.
///
/// Fails fast, before any network activity, when the name is not one of
/// [`SUPPORTED`] or the selected backend has no credential configured.
///
/// # Errors
///
/// Returns [`VigilError::Config`] for an unsupported provider name or a
/// missing API key.
///
/// # Examples
///
/// ```
/// use vigil_core::LlmConfig;
/// use vigil_review::provider::create;
///
/// let mut config = LlmConfig::default();
/// config.openai.api_key = Some("sk-test".into());
/// let provider = create(&config).unwrap();
/// assert_eq!(provider.name(), "openai");
/// ```
pub fn create(config: &LlmConfig) -> Result<Box<dyn Provider>, VigilError> {
    match config.provider.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::new(&config.openai)?)),
        "anthropic" => Ok(Box::new(AnthropicProvider::new(&config.anthropic)?)),
        "gemini" => Ok(Box::new(GeminiProvider::new(&config.gemini)?)),
        other => Err(VigilError::Config(format!(
            "unsupported provider '{other}', expected one of: {}",
            SUPPORTED.join(", ")
        ))),
    }
}

pub(crate) fn require_key(
    api_key: Option<&str>,
    env_var: &'static str,
) -> Result<String, VigilError> {
    api_key.map(str::to_string).ok_or_else(|| {
        VigilError::Config(format!(
            "{env_var} not set. Export it or add api_key to .vigil.toml"
        ))
    })
}

pub(crate) fn http_client() -> Result<reqwest::Client, VigilError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .map_err(|e| VigilError::Provider(format!("failed to create HTTP client: {e}")))
}
