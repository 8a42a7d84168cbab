//! Text provider abstraction and implementations.
//!
//! A provider turns a prompt into generated prose. Google Gemini is the
//! wired-in implementation; the trait is the seam for adding others.

pub mod gemini;

use crate::AiError;

/// Trait for generative-text providers.
#[async_trait::async_trait]
pub trait TextProvider: Send + Sync {
    /// Generates text for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Creates a text provider from environment variables.
///
/// Reads `GEMINI_API_KEY` (required) and `GEMINI_MODEL` (defaults to
/// `gemini-2.0-flash-exp`).
///
/// # Errors
///
/// Returns [`AiError::Config`] if no API key is configured.
pub fn create_provider_from_env() -> Result<Box<dyn TextProvider>, AiError> {
    let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| AiError::Config {
        message: "GEMINI_API_KEY environment variable not set".to_string(),
    })?;
    let model =
        std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string());

    log::info!("Using Gemini text provider (model {model})");
    Ok(Box::new(gemini::GeminiProvider::new(api_key, model)))
}
