use serde::Serialize;
use std::fmt;

/// A rendered email, ready for any provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    /// Overrides the provider's default sender.
    pub from: Option<String>,
}

/// Position of the provider that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    Primary,
    Fallback,
    None,
}

impl fmt::Display for ProviderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
            Self::None => "none",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    pub provider_used: ProviderRole,
    pub message_id: Option<String>,
    pub failure_reason: Option<String>,
}

impl DeliveryOutcome {
    #[must_use]
    pub const fn delivered(provider_used: ProviderRole, message_id: String) -> Self {
        Self { delivered: true, provider_used, message_id: Some(message_id), failure_reason: None }
    }

    #[must_use]
    pub const fn failed(provider_used: ProviderRole, reason: String) -> Self {
        Self { delivered: false, provider_used, message_id: None, failure_reason: Some(reason) }
    }
}
