//! Google Gemini `generateContent` provider.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::CompletionProvider;
use crate::AiError;

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with a fixed request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            model,
            base_url,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: [GeminiPart<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
    generation_config: GenerationConfig,
}

fn request_body(prompt: &str) -> GeminiRequest<'_> {
    GeminiRequest {
        contents: [GeminiContent {
            parts: [GeminiPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.4,
            max_output_tokens: 1024,
        },
    }
}

fn error_for_status(status: u16, message: String) -> AiError {
    match status {
        401 | 403 => AiError::Authentication { status },
        429 => AiError::RateLimited,
        400 if message.contains("API key") => AiError::Authentication { status },
        _ => AiError::Provider { status, message },
    }
}

/// Interprets a `generateContent` response.
///
/// Checks, in order: the HTTP status and any `error` object,
/// `promptFeedback.blockReason`, `candidates[0].finishReason` (`SAFETY` and
/// `RECITATION` count as filtered), and finally
/// `candidates[0].content.parts[0].text`.
///
/// # Errors
///
/// Returns the [`AiError`] matching the first problem found.
pub fn interpret_response(status: u16, body: &str) -> Result<String, AiError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let success = (200..300).contains(&status);

    if let Some(error) = parsed.as_ref().and_then(|v| v.get("error")) {
        let code = error
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(status);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(error_for_status(code, message));
    }

    if !success {
        return Err(error_for_status(status, body.chars().take(200).collect()));
    }

    let Some(value) = parsed else {
        return Err(AiError::InvalidResponse {
            message: "response body is not JSON".to_string(),
        });
    };

    if let Some(reason) = value
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(AiError::ContentFiltered {
            reason: reason.to_string(),
        });
    }

    let candidate = value.get("candidates").and_then(|c| c.get(0));

    if let Some(reason @ ("SAFETY" | "RECITATION")) = candidate
        .and_then(|c| c.get("finishReason"))
        .and_then(Value::as_str)
    {
        return Err(AiError::ContentFiltered {
            reason: reason.to_string(),
        });
    }

    candidate
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
        .ok_or(AiError::EmptyResponse)
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body(prompt))
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;

        log::debug!("Gemini responded with HTTP {status} ({} bytes)", body.len());

        interpret_response(status, &body)
    }
}
