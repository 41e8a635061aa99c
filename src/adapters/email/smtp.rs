use crate::adapters::email::{DeliveryError, EmailProvider};
use crate::config::SmtpConfig;
use crate::domain::email::EmailMessage;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

#[derive(Clone)]
struct Account {
    user: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

/// Sends through an authenticated SMTP relay (Gmail by default).
#[derive(Clone)]
pub struct SmtpProvider {
    account: Option<Account>,
    host: String,
}

impl std::fmt::Debug for SmtpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpProvider")
            .field("host", &self.host)
            .field("user", &self.account.as_ref().map(|a| a.user.as_str()))
            .finish_non_exhaustive()
    }
}

impl SmtpProvider {
    /// Builds the relay transport when both user and password are present.
    /// The transport opens one connection per message and spawns nothing, so
    /// this is safe to call outside a Tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the relay host cannot be resolved into a TLS transport.
    pub fn new(config: &SmtpConfig, timeout: Duration) -> Result<Self, lettre::transport::smtp::Error> {
        let credentials = match (&config.user, &config.password) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user.clone(), password.clone()))
            }
            _ => None,
        };

        let account = match credentials {
            Some((user, password)) => {
                let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
                    .port(config.port)
                    .timeout(Some(timeout))
                    .credentials(Credentials::new(user.clone(), password))
                    .build();
                Some(Account { user, transport })
            }
            None => None,
        };

        Ok(Self { account, host: config.host.clone() })
    }
}

fn build_message(message: &EmailMessage, default_from: &str) -> Result<Message, DeliveryError> {
    let from: Mailbox = message
        .from
        .as_deref()
        .unwrap_or(default_from)
        .parse()
        .map_err(|e| DeliveryError::Malformed(format!("sender: {e}")))?;
    let to: Mailbox = message.to.parse().map_err(|e| DeliveryError::Malformed(format!("recipient: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(&message.subject)
        .multipart(MultiPart::alternative_plain_html(message.text.clone(), message.html.clone()))
        .map_err(|e| DeliveryError::Malformed(e.to_string()))
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn is_configured(&self) -> bool {
        self.account.is_some()
    }

    #[tracing::instrument(skip(self, message), fields(provider = "smtp", host = %self.host), err(level = "warn"))]
    async fn send(&self, message: &EmailMessage) -> Result<String, DeliveryError> {
        let Some(account) = &self.account else {
            return Err(DeliveryError::MissingCredentials("smtp"));
        };

        let email = build_message(message, &format!("\"StarCast\" <{}>", account.user))?;
        let message_id = email
            .headers()
            .get_raw("Message-ID")
            .map_or_else(String::new, |id| id.trim_matches(|c| c == '<' || c == '>').to_owned());

        let response = account.transport.send(email).await.map_err(|e| {
            if e.is_permanent() {
                DeliveryError::Rejected(e.to_string())
            } else {
                DeliveryError::Transport(e.to_string())
            }
        })?;

        tracing::info!(message_id = %message_id, code = %response.code(), "Email sent via SMTP");
        Ok(message_id)
    }
}
