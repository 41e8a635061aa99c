use crate::adapters::email::{DeliveryError, EmailProvider};
use crate::config::ResendConfig;
use crate::domain::email::EmailMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    name: Option<String>,
}

/// Sends through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    sender: String,
}

impl ResendProvider {
    /// Builds the provider and its HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ResendConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            sender: config.sender.clone(),
        })
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    fn name(&self) -> &'static str {
        "resend"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[tracing::instrument(skip(self, message), fields(provider = "resend"), err(level = "warn"))]
    async fn send(&self, message: &EmailMessage) -> Result<String, DeliveryError> {
        let Some(api_key) = &self.api_key else {
            return Err(DeliveryError::MissingCredentials("resend"));
        };

        let body = SendEmailRequest {
            from: message.from.as_deref().unwrap_or(&self.sender),
            to: [&message.to],
            subject: &message.subject,
            text: &message.text,
            html: &message.html,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorResponse>().await {
                Ok(ErrorResponse { message: Some(m), name }) => {
                    format!("{} ({status})", name.map_or(m.clone(), |n| format!("{n}: {m}")))
                }
                _ => status.to_string(),
            };
            return Err(DeliveryError::Rejected(detail));
        }

        let parsed: SendEmailResponse =
            response.json().await.map_err(|e| DeliveryError::Transport(format!("unreadable response: {e}")))?;

        tracing::info!(message_id = %parsed.id, "Email sent via Resend");
        Ok(parsed.id)
    }
}
