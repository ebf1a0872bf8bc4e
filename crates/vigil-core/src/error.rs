/// Errors that can occur across the Vigil pipeline.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the
/// boundary. Only [`VigilError::Config`] is fatal to a review run: provider
/// and decode failures degrade to a fallback review result so the pipeline
/// still emits exactly one response per request.
///
/// # Examples
///
/// ```
/// use vigil_core::VigilError;
///
/// let err = VigilError::Config("OPENAI_API_KEY not set".into());
/// assert!(err.to_string().contains("OPENAI_API_KEY"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum VigilError {
    /// Filesystem or stream I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration, including an unsupported provider
    /// name or an absent credential for the selected provider.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network, HTTP, or response-shape failure talking to an AI backend.
    #[error("provider error: {0}")]
    Provider(String),

    /// Model output did not match the expected review schema.
    #[error("decode error: {0}")]
    Decode(String),

    /// GitHub API failure while fetching a diff or posting a review.
    #[error("GitHub error: {0}")]
    Github(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
