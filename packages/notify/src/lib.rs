#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transactional email delivery for outbreak alerts.
//!
//! [`Mailer`] is the seam the server talks to. [`BrevoMailer`] sends
//! through the Brevo (formerly Sendinblue) `smtp/email` endpoint with a
//! fixed timeout and no retries.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while sending email.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("Email provider returned HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Provider message, if any.
        message: String,
    },

    /// Email is not configured (no API key or sender).
    #[error("Email delivery is not configured: {message}")]
    NotConfigured {
        /// What is missing.
        message: String,
    },

    /// The message has no recipients.
    #[error("No recipients")]
    NoRecipients,
}

/// An email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    /// Address.
    pub email: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A plain-text message to one or more recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipients.
    pub to: Vec<Recipient>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
}

/// Sends email.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers `email`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the message cannot be delivered.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError>;
}

/// [`Mailer`] used when no email API key is configured. Always fails with
/// [`NotifyError::NotConfigured`].
pub struct DisabledMailer;

#[async_trait::async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured {
            message: "EMAIL_API_KEY is not set".to_string(),
        })
    }
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoRequest<'a> {
    sender: BrevoSender<'a>,
    to: &'a [Recipient],
    subject: &'a str,
    text_content: &'a str,
}

/// Brevo transactional email client.
pub struct BrevoMailer {
    api_key: String,
    base_url: String,
    sender_email: String,
    sender_name: String,
    client: reqwest::Client,
}

impl BrevoMailer {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        base_url: String,
        sender_email: String,
        sender_name: String,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url,
            sender_email,
            sender_name,
            client,
        })
    }

    fn request_body<'a>(&'a self, email: &'a OutgoingEmail) -> BrevoRequest<'a> {
        BrevoRequest {
            sender: BrevoSender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: &email.to,
            subject: &email.subject,
            text_content: &email.text,
        }
    }
}

#[async_trait::async_trait]
impl Mailer for BrevoMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        if email.to.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        let resp = self
            .client
            .post(format!("{}/smtp/email", self.base_url.trim_end_matches('/')))
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&self.request_body(email))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["message"].as_str().map(ToString::to_string))
                .unwrap_or(body);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        log::info!(
            "Sent '{}' to {} recipient(s)",
            email.subject,
            email.to.len()
        );

        Ok(())
    }
}
