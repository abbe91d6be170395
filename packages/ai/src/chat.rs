//! Single-shot chat: context plus message in, one reply out.

use std::future::Future;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::ChatFailure;
use crate::providers::CompletionProvider;

/// Reply for a blank message. The provider is not called.
pub const EMPTY_MESSAGE_REPLY: &str =
    "Please type a question about dengue cases, risk levels, weather, or prevention.";

const INSTRUCTIONS: &str = "\
You are a dengue surveillance assistant for barangay health workers and \
officials. Answer using the surveillance data below. When the data does not \
cover the question, say so instead of guessing. Quote numbers with their \
units. Keep answers short and practical, and recommend contacting the \
listed barangay officials or the nearest health center for medical concerns.";

/// The answer returned to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    /// Text shown to the user, either generated or a fixed failure message.
    pub response: String,
    /// RFC 3339 time the reply was produced.
    pub timestamp: String,
    /// Failure category when the provider call did not succeed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ChatFailure>,
}

impl ChatReply {
    fn new(response: impl Into<String>, failure: Option<ChatFailure>) -> Self {
        Self {
            response: response.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            failure,
        }
    }
}

/// Combines the context block and the user's message into one prompt.
#[must_use]
pub fn build_prompt(context: &str, message: &str) -> String {
    format!("{INSTRUCTIONS}\n\n{context}\n\nUser question: {message}\n")
}

/// Answers `message`.
///
/// Blank messages get [`EMPTY_MESSAGE_REPLY`] without calling
/// `load_context` or the provider. A failed context load or provider call
/// is logged and turned into the matching [`ChatFailure`] message; this
/// function never fails.
pub async fn reply<F, Fut, E>(
    provider: &dyn CompletionProvider,
    message: &str,
    load_context: F,
) -> ChatReply
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: std::fmt::Display,
{
    let message = message.trim();
    if message.is_empty() {
        return ChatReply::new(EMPTY_MESSAGE_REPLY, None);
    }

    let context = match load_context().await {
        Ok(context) => context,
        Err(e) => {
            log::error!("Failed to build chat context: {e}");
            let failure = ChatFailure::ServiceUnavailable;
            return ChatReply::new(failure.user_message(), Some(failure));
        }
    };

    let prompt = build_prompt(&context, message);
    log::debug!("Sending chat prompt ({} bytes)", prompt.len());

    match provider.complete(&prompt).await {
        Ok(text) => ChatReply::new(text, None),
        Err(e) => {
            let failure = e.failure();
            log::error!("Chat completion failed ({failure}): {e}");
            ChatReply::new(failure.user_message(), Some(failure))
        }
    }
}
