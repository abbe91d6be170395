//! Completion provider abstraction.
//!
//! Only Gemini is implemented; the trait is the seam the server and tests
//! talk to.

pub mod gemini;

use std::time::Duration;

use dengue_watch_config::AiConfig;

use crate::AiError;

/// Single-prompt text completion.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `prompt` and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails or the response carries no
    /// usable text.
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

/// Provider used when no API key is configured. Every call fails with
/// [`AiError::Config`], which users see as an authentication failure.
pub struct UnconfiguredProvider;

#[async_trait::async_trait]
impl CompletionProvider for UnconfiguredProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::Config {
            message: "AI_API_KEY is not set".to_string(),
        })
    }
}

/// Creates the provider described by `config`.
///
/// Falls back to [`UnconfiguredProvider`] when no API key is set so the
/// server still starts.
///
/// # Errors
///
/// Returns [`AiError::Http`] if the HTTP client cannot be built.
pub fn create_provider(config: &AiConfig) -> Result<Box<dyn CompletionProvider>, AiError> {
    let Some(api_key) = config.api_key.clone() else {
        log::warn!("No AI API key configured; chatbot requests will report an auth failure");
        return Ok(Box::new(UnconfiguredProvider));
    };

    log::info!("Using Gemini model {}", config.model);

    Ok(Box::new(gemini::GeminiProvider::new(
        api_key,
        config.model.clone(),
        config.base_url.clone(),
        Duration::from_secs(config.timeout_secs),
    )?))
}
