#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Narrative generation for incident reports.
//!
//! Turns a finished [`hazard_map_report::Report`] into a prose assessment
//! via a generative-text provider. The provider sits behind the
//! [`providers::TextProvider`] trait so the server can run without
//! credentials (no narrative) and tests can substitute a canned
//! implementation. Nothing in the aggregation pipeline depends on this
//! crate; narrative is strictly downstream of the structured report.

pub mod prompt;
pub mod providers;

use thiserror::Error;

/// Errors that can occur during narrative generation.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to the provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
