//! Core types, configuration, and error handling for Vigil.
//!
//! This crate provides the shared foundation used by the review pipeline and
//! the line-protocol server:
//! - [`VigilError`] — unified error type using `thiserror`
//! - [`VigilConfig`] — read-once configuration (environment over `.vigil.toml`)
//! - Shared types: [`Severity`], [`Finding`], [`ReviewResult`], [`Verdict`],
//!   [`PostingMode`]

mod config;
mod error;
mod types;

pub use config::{BackendConfig, LlmConfig, ReviewConfig, VigilConfig};
pub use error::VigilError;
pub use types::{Finding, PostingMode, ReviewResult, Severity, Verdict};

/// A convenience `Result` type for Vigil operations.
pub type Result<T> = std::result::Result<T, VigilError>;
