use crate::adapters::email::EmailProvider;
use crate::domain::email::{DeliveryOutcome, EmailMessage, ProviderRole};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct Metrics {
    attempts: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("starcast-server");
        Self {
            attempts: meter
                .u64_counter("email_delivery_attempts_total")
                .with_description("Email delivery attempts per provider and result")
                .build(),
        }
    }
}

/// Tries each provider in order until one delivers.
///
/// The first provider is reported as [`ProviderRole::Primary`], every later
/// one as [`ProviderRole::Fallback`].
#[derive(Clone, Debug)]
pub struct EmailGateway {
    providers: Vec<Arc<dyn EmailProvider>>,
    metrics: Metrics,
}

impl EmailGateway {
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn EmailProvider>>) -> Self {
        Self { providers, metrics: Metrics::new() }
    }

    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn EmailProvider>] {
        &self.providers
    }

    /// Sends the message, falling back through the provider list.
    ///
    /// Never fails: provider errors become a failed [`DeliveryOutcome`] carrying
    /// the last provider's reason.
    #[tracing::instrument(level = "debug", skip(self, message), fields(subject = %message.subject))]
    pub async fn send(&self, message: &EmailMessage) -> DeliveryOutcome {
        let mut outcome = DeliveryOutcome::failed(ProviderRole::None, "No email provider available".to_owned());

        for (index, provider) in self.providers.iter().enumerate() {
            let role = if index == 0 { ProviderRole::Primary } else { ProviderRole::Fallback };

            match provider.send(message).await {
                Ok(message_id) => {
                    self.record(provider.name(), "delivered");
                    return DeliveryOutcome::delivered(role, message_id);
                }
                Err(e) => {
                    self.record(provider.name(), "failed");
                    tracing::warn!(provider = provider.name(), role = %role, error = %e, "Email provider failed");
                    outcome = DeliveryOutcome::failed(role, e.to_string());
                }
            }
        }

        outcome
    }

    fn record(&self, provider: &'static str, result: &'static str) {
        self.metrics
            .attempts
            .add(1, &[KeyValue::new("provider", provider), KeyValue::new("result", result)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::DeliveryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct StubProvider {
        succeed: bool,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(succeed: bool) -> Arc<Self> {
            Arc::new(Self { succeed, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl EmailProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn is_configured(&self) -> bool {
            self.succeed
        }

        async fn send(&self, _message: &EmailMessage) -> Result<String, DeliveryError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(format!("msg-{n}"))
            } else {
                Err(DeliveryError::MissingCredentials("stub"))
            }
        }
    }

    fn gateway_of(providers: &[Arc<StubProvider>]) -> EmailGateway {
        EmailGateway::new(providers.iter().map(|p| Arc::clone(p) as Arc<dyn EmailProvider>).collect())
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "owner@example.com".into(),
            subject: "Test".into(),
            text: "t".into(),
            html: "<p>t</p>".into(),
            from: None,
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = StubProvider::new(true);
        let fallback = StubProvider::new(true);
        let gateway = gateway_of(&[Arc::clone(&primary), Arc::clone(&fallback)]);

        let outcome = gateway.send(&message()).await;

        assert!(outcome.delivered);
        assert_eq!(outcome.provider_used, ProviderRole::Primary);
        assert_eq!(outcome.message_id.as_deref(), Some("msg-0"));
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_used_when_primary_fails() {
        let primary = StubProvider::new(false);
        let fallback = StubProvider::new(true);
        let gateway = gateway_of(&[Arc::clone(&primary), Arc::clone(&fallback)]);

        let outcome = gateway.send(&message()).await;

        assert!(outcome.delivered);
        assert_eq!(outcome.provider_used, ProviderRole::Fallback);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_fail_reports_fallback_reason() {
        let gateway = gateway_of(&[StubProvider::new(false), StubProvider::new(false)]);

        let outcome = gateway.send(&message()).await;

        assert!(!outcome.delivered);
        assert_eq!(outcome.provider_used, ProviderRole::Fallback);
        assert_eq!(outcome.failure_reason.as_deref(), Some("Missing credentials for stub"));
    }

    #[tokio::test]
    async fn test_no_providers() {
        let outcome = EmailGateway::new(Vec::new()).send(&message()).await;
        assert!(!outcome.delivered);
        assert_eq!(outcome.provider_used, ProviderRole::None);
    }
}
