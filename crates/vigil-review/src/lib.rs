//! The Vigil review pipeline: patch in, structured verdict out.
//!
//! Provides patch bounding, prompt construction, the provider gateway,
//! defensive response decoding, the posting decision engine, report
//! rendering, and GitHub PR integration.

pub mod bound;
pub mod decision;
pub mod decode;
pub mod github;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod report;
pub mod sanitize;
