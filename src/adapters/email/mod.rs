use crate::domain::email::EmailMessage;
use async_trait::async_trait;
use thiserror::Error;

pub mod resend;
pub mod smtp;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Missing credentials for {0}")]
    MissingCredentials(&'static str),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Rejected by provider: {0}")]
    Rejected(String),
    #[error("Malformed message: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait EmailProvider: Send + Sync + std::fmt::Debug {
    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Whether the provider has the credentials it needs to attempt a send.
    fn is_configured(&self) -> bool;

    /// Delivers a message and returns the provider's message id.
    ///
    /// # Errors
    /// Returns `DeliveryError::MissingCredentials` when the provider is not configured,
    /// and a transport or rejection error when the send itself fails.
    async fn send(&self, message: &EmailMessage) -> Result<String, DeliveryError>;
}
