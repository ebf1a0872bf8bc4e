//! The end-to-end review pipeline: bound the patch, build the prompt, invoke
//! the provider, sanitize and decode the answer.
//!
//! One patch in, one [`ReviewResult`] out. Provider and decode failures are
//! logged and degraded to a fallback result so every invocation produces
//! exactly one response; only configuration errors abort construction.

use vigil_core::{ReviewResult, VigilConfig, VigilError};

use crate::bound::bound;
use crate::decode::decode_or_fallback;
use crate::prompt::build_review_prompt;
use crate::provider::{self, Provider};

/// Review orchestrator holding the selected provider and the patch budget.
///
/// Single-flight: each [`review`](ReviewPipeline::review) call is one bounded
/// patch, one outbound provider call, one decoded result. No state is shared
/// across invocations.
pub struct ReviewPipeline {
    provider: Box<dyn Provider>,
    max_patch_bytes: usize,
}

impl ReviewPipeline {
    /// Build the pipeline from configuration, constructing the selected
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] for an unsupported provider name or a
    /// missing credential — before any network activity.
    pub fn new(config: &VigilConfig) -> Result<Self, VigilError> {
        Ok(Self {
            provider: provider::create(&config.llm)?,
            max_patch_bytes: config.review.max_patch_bytes,
        })
    }

    /// Build the pipeline around an explicit provider. Used by tests and by
    /// callers that construct providers themselves.
    pub fn with_provider(provider: Box<dyn Provider>, max_patch_bytes: usize) -> Self {
        Self {
            provider,
            max_patch_bytes,
        }
    }

    /// Name of the backend this pipeline talks to.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Review one patch.
    ///
    /// Always returns a result: a failed provider call or undecodable model
    /// output is logged and converted into a fallback result whose summary
    /// explains the failure.
    pub async fn review(&self, patch: &str) -> ReviewResult {
        let bounded = bound(patch, self.max_patch_bytes);
        let prompt = build_review_prompt(&bounded);

        let raw = match self.provider.invoke(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("warning: provider call failed: {e}");
                return ReviewResult::fallback(format!("Review failed: {e}"));
            }
        };

        decode_or_fallback(&raw)
    }
}
