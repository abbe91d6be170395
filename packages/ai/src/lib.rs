#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chatbot support for the surveillance dashboard.
//!
//! A single-shot completion flow: the surveillance snapshot is rendered into
//! a bounded context block ([`context`]), combined with the user's message
//! ([`chat`]), and sent to a [`providers::CompletionProvider`]. Every
//! provider failure is mapped to a [`ChatFailure`] whose fixed message is
//! what the user sees. There is no tool use, no conversation memory, and no
//! retry.

pub mod chat;
pub mod context;
pub mod providers;

use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to the provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the API key.
    #[error("Authentication failed (HTTP {status})")]
    Authentication {
        /// HTTP status code.
        status: u16,
    },

    /// The provider is throttling requests.
    #[error("Rate limited")]
    RateLimited,

    /// The prompt or the answer was blocked by the provider's safety
    /// filter.
    #[error("Content filtered: {reason}")]
    ContentFiltered {
        /// Block or finish reason reported by the provider.
        reason: String,
    },

    /// The provider answered with an error status.
    #[error("Provider error (HTTP {status}): {message}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Provider message.
        message: String,
    },

    /// The response carried no text.
    #[error("Empty response")]
    EmptyResponse,

    /// The response body could not be interpreted.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was wrong.
        message: String,
    },

    /// The provider is not configured.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// User-facing category of a chat failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChatFailure {
    /// Missing or rejected API key.
    Authentication,
    /// Too many requests.
    RateLimited,
    /// Blocked by the safety filter.
    ContentFiltered,
    /// Provider down, erroring, or unreachable.
    ServiceUnavailable,
    /// No usable text in the response.
    EmptyResponse,
}

impl ChatFailure {
    /// The fixed message shown to the user.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Authentication => {
                "The assistant is not available because its API credentials were rejected. Please contact the system administrator."
            }
            Self::RateLimited => {
                "The assistant is receiving too many requests right now. Please wait a moment and try again."
            }
            Self::ContentFiltered => {
                "I can't respond to that request because it was blocked by the content safety filter. Please rephrase your question."
            }
            Self::ServiceUnavailable => {
                "The assistant service is temporarily unavailable. Please try again later."
            }
            Self::EmptyResponse => {
                "The assistant returned an empty or unreadable response. Please try asking again."
            }
        }
    }
}

impl AiError {
    /// Maps the error to the failure category shown to the user.
    #[must_use]
    pub const fn failure(&self) -> ChatFailure {
        match self {
            Self::Authentication { .. } | Self::Config { .. } => ChatFailure::Authentication,
            Self::RateLimited => ChatFailure::RateLimited,
            Self::ContentFiltered { .. } => ChatFailure::ContentFiltered,
            Self::Http(_) | Self::Provider { .. } => ChatFailure::ServiceUnavailable,
            Self::EmptyResponse | Self::InvalidResponse { .. } => ChatFailure::EmptyResponse,
        }
    }
}
