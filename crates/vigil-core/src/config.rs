use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VigilError;
use crate::types::PostingMode;

/// Default maximum patch size sent to the model, in UTF-8 bytes.
pub const DEFAULT_MAX_PATCH_BYTES: usize = 350_000;

const OPENAI_DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Top-level configuration, read once at process start.
///
/// Supports layered resolution: environment variables > `.vigil.toml` >
/// defaults. The loaded struct is immutable afterwards and passed explicitly
/// into component constructors; no ambient lookups inside the pipeline.
///
/// # Examples
///
/// ```
/// use vigil_core::VigilConfig;
///
/// let config = VigilConfig::default();
/// assert_eq!(config.llm.provider, "openai");
/// assert_eq!(config.review.max_patch_bytes, 350_000);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    /// AI backend settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Review behavior settings.
    #[serde(default)]
    pub review: ReviewConfig,
}

impl VigilConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Io`] if the file cannot be read, or
    /// [`VigilError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vigil_core::VigilConfig;
    /// use std::path::Path;
    ///
    /// let config = VigilConfig::from_file(Path::new(".vigil.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, VigilError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::VigilConfig;
    ///
    /// let toml = r#"
    /// [review]
    /// max_patch_bytes = 1000
    /// "#;
    /// let config = VigilConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.review.max_patch_bytes, 1000);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, VigilError> {
        let mut config: Self = toml::from_str(content)?;
        config.llm.fill_missing_models();
        Ok(config)
    }

    /// Resolve the effective configuration: explicit file, or `.vigil.toml`
    /// in the working directory if present, then the process environment on
    /// top.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Io`] or [`VigilError::Toml`] when an explicit or
    /// discovered config file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, VigilError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(".vigil.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.overlay(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply environment-style overrides on top of the current values.
    ///
    /// Takes a lookup closure instead of reading `std::env` directly so tests
    /// can drive it without mutating process state.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil_core::VigilConfig;
    ///
    /// let mut config = VigilConfig::default();
    /// config.overlay(|name| match name {
    ///     "VIGIL_PROVIDER" => Some("anthropic".into()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.llm.provider, "anthropic");
    /// ```
    pub fn overlay(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("VIGIL_PROVIDER") {
            self.llm.provider = v;
        }
        if let Some(v) = var("OPENAI_MODEL") {
            self.llm.openai.model = v;
        }
        if let Some(v) = var("OPENAI_API_KEY") {
            self.llm.openai.api_key = Some(v);
        }
        if let Some(v) = var("ANTHROPIC_MODEL") {
            self.llm.anthropic.model = v;
        }
        if let Some(v) = var("ANTHROPIC_API_KEY") {
            self.llm.anthropic.api_key = Some(v);
        }
        if let Some(v) = var("GEMINI_MODEL") {
            self.llm.gemini.model = v;
        }
        if let Some(v) = var("GEMINI_API_KEY") {
            self.llm.gemini.api_key = Some(v);
        }
        if let Some(v) = var("VIGIL_MAX_PATCH_BYTES") {
            match v.parse::<usize>() {
                Ok(n) => self.review.max_patch_bytes = n,
                Err(_) => eprintln!("warning: ignoring invalid VIGIL_MAX_PATCH_BYTES: {v}"),
            }
        }
        if let Some(v) = var("VIGIL_REVIEW_EVENT") {
            self.review.event = PostingMode::parse(&v);
        }
        if let Some(v) = var("VIGIL_FAIL_ON_HIGH") {
            self.review.fail_on_high = is_truthy(&v);
        }
        if let Some(v) = var("VIGIL_ONE_SHOT") {
            self.review.one_shot = is_truthy(&v);
        }
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(v, "1" | "true" | "TRUE" | "True")
}

/// AI backend configuration: selected provider plus per-backend settings.
///
/// # Examples
///
/// ```
/// use vigil_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.provider, "openai");
/// assert_eq!(config.anthropic.model, "claude-3-5-sonnet-20240620");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (`"openai"`, `"anthropic"`, or `"gemini"`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// OpenAI backend settings.
    #[serde(default = "default_openai")]
    pub openai: BackendConfig,
    /// Anthropic backend settings.
    #[serde(default = "default_anthropic")]
    pub anthropic: BackendConfig,
    /// Gemini backend settings.
    #[serde(default = "default_gemini")]
    pub gemini: BackendConfig,
}

impl LlmConfig {
    // A partially-specified TOML section (api_key only) leaves the model
    // empty; fill it with the backend's hardcoded default.
    fn fill_missing_models(&mut self) {
        if self.openai.model.is_empty() {
            self.openai.model = OPENAI_DEFAULT_MODEL.into();
        }
        if self.anthropic.model.is_empty() {
            self.anthropic.model = ANTHROPIC_DEFAULT_MODEL.into();
        }
        if self.gemini.model.is_empty() {
            self.gemini.model = GEMINI_DEFAULT_MODEL.into();
        }
    }
}

fn default_provider() -> String {
    "openai".into()
}

fn default_openai() -> BackendConfig {
    BackendConfig {
        model: OPENAI_DEFAULT_MODEL.into(),
        api_key: None,
    }
}

fn default_anthropic() -> BackendConfig {
    BackendConfig {
        model: ANTHROPIC_DEFAULT_MODEL.into(),
        api_key: None,
    }
}

fn default_gemini() -> BackendConfig {
    BackendConfig {
        model: GEMINI_DEFAULT_MODEL.into(),
        api_key: None,
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai: default_openai(),
            anthropic: default_anthropic(),
            gemini: default_gemini(),
        }
    }
}

/// Settings for one AI backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Model identifier sent in requests.
    #[serde(default)]
    pub model: String,
    /// API credential; required for the selected provider.
    pub api_key: Option<String>,
}

/// Review behavior configuration.
///
/// # Examples
///
/// ```
/// use vigil_core::{PostingMode, ReviewConfig};
///
/// let config = ReviewConfig::default();
/// assert_eq!(config.max_patch_bytes, 350_000);
/// assert_eq!(config.event, PostingMode::Comment);
/// assert!(!config.fail_on_high);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Maximum patch size in UTF-8 bytes before truncation (default: 350000).
    #[serde(default = "default_max_patch_bytes")]
    pub max_patch_bytes: usize,
    /// How the posted review event is derived from findings.
    #[serde(default)]
    pub event: PostingMode,
    /// Exit non-zero when the review contains a High-severity finding.
    #[serde(default)]
    pub fail_on_high: bool,
    /// Close the line-protocol channel after the first response.
    #[serde(default)]
    pub one_shot: bool,
}

fn default_max_patch_bytes() -> usize {
    DEFAULT_MAX_PATCH_BYTES
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_patch_bytes: default_max_patch_bytes(),
            event: PostingMode::default(),
            fail_on_high: false,
            one_shot: false,
        }
    }
}
