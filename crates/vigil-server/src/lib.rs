//! Line-protocol server exposing the review pipeline over stdio.
//!
//! Each input line carries a JSON request
//! `{ "method": "review_diff", "params": { "patch": "…" } }`; each recognized
//! request produces exactly one JSON response line matching the review
//! result schema before the next line is read.
//!
//! # Examples
//!
//! ```no_run
//! use vigil_core::VigilConfig;
//! use vigil_review::pipeline::ReviewPipeline;
//!
//! # async fn example() -> Result<(), vigil_core::VigilError> {
//! let config = VigilConfig::load(None)?;
//! let pipeline = ReviewPipeline::new(&config)?;
//! vigil_server::server::serve(&pipeline, config.review.one_shot).await?;
//! # Ok(())
//! # }
//! ```

pub mod server;
