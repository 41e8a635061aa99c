use crate::domain::email::{DeliveryOutcome, EmailMessage};
use crate::domain::locale::{Locale, Notice};
use crate::domain::submission::{SubmissionRequest, SubmissionResult};
use crate::services::email_gateway::EmailGateway;
use crate::services::templates;
use time::OffsetDateTime;

/// Results of the two sends made for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub operator: DeliveryOutcome,
    pub confirmation: DeliveryOutcome,
}

impl DispatchReport {
    /// Folds both outcomes into the result shown to the submitter.
    ///
    /// A failed notification never turns an accepted submission into a
    /// rejected one.
    #[must_use]
    pub fn to_result(&self, locale: Locale) -> SubmissionResult {
        match (self.operator.delivered, self.confirmation.delivered) {
            (true, true) => SubmissionResult::accepted(),
            (false, true) => SubmissionResult::degraded(Notice::AdminNotificationFailed.text(locale).to_owned()),
            (true, false) => SubmissionResult::degraded(Notice::ConfirmationFailed.text(locale).to_owned()),
            (false, false) => SubmissionResult::degraded(Notice::ContactManually.text(locale).to_owned()),
        }
    }
}

/// Builds and sends the operator notification and the submitter confirmation.
#[derive(Clone, Debug)]
pub struct NotificationDispatcher {
    gateway: EmailGateway,
    operator_address: String,
}

impl NotificationDispatcher {
    #[must_use]
    pub const fn new(gateway: EmailGateway, operator_address: String) -> Self {
        Self { gateway, operator_address }
    }

    /// Renders both messages without sending anything.
    #[must_use]
    pub fn render(&self, request: &SubmissionRequest, at: OffsetDateTime) -> (EmailMessage, EmailMessage) {
        (
            templates::operator_notification(request, &self.operator_address, at),
            templates::confirmation(request, at),
        )
    }

    /// Sends both messages. The confirmation is attempted whatever happened to
    /// the operator notification.
    #[tracing::instrument(skip_all, fields(category = %request.category))]
    pub async fn dispatch(&self, request: &SubmissionRequest) -> DispatchReport {
        let (operator_msg, confirmation_msg) = self.render(request, OffsetDateTime::now_utc());

        let operator = self.gateway.send(&operator_msg).await;
        if !operator.delivered {
            tracing::error!(
                reason = operator.failure_reason.as_deref().unwrap_or_default(),
                "Operator notification failed"
            );
        }

        let confirmation = self.gateway.send(&confirmation_msg).await;
        if !confirmation.delivered {
            tracing::error!(
                reason = confirmation.failure_reason.as_deref().unwrap_or_default(),
                "Confirmation email failed"
            );
        }

        DispatchReport { operator, confirmation }
    }

    /// Logs what would have been sent. Used in preview deployments.
    pub fn simulate(&self, request: &SubmissionRequest) {
        let (operator_msg, confirmation_msg) = self.render(request, OffsetDateTime::now_utc());
        for msg in [&operator_msg, &confirmation_msg] {
            tracing::info!(to = %msg.to, subject = %msg.subject, "Preview mode: email not sent");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::{DeliveryError, EmailProvider};
    use crate::domain::email::ProviderRole;
    use crate::domain::submission::FormCategory;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Fails every message addressed to one recipient.
    #[derive(Debug, Default)]
    struct RecipientFilter {
        failing_recipient: Option<String>,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EmailProvider for RecipientFilter {
        fn name(&self) -> &'static str {
            "filter"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn send(&self, message: &EmailMessage) -> Result<String, DeliveryError> {
            self.sent.lock().unwrap().push(message.to.clone());
            if self.failing_recipient.as_deref() == Some(message.to.as_str()) {
                return Err(DeliveryError::Rejected("mailbox unavailable".into()));
            }
            Ok("id".into())
        }
    }

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            name: "Ana".into(),
            surname: "Pop".into(),
            email: "ana@example.com".into(),
            handle: "@ana.pop".into(),
            category: FormCategory::Signup,
        }
    }

    fn dispatcher(provider: Arc<RecipientFilter>) -> NotificationDispatcher {
        let providers: Vec<Arc<dyn EmailProvider>> = vec![provider];
        NotificationDispatcher::new(EmailGateway::new(providers), "owner@example.com".into())
    }

    #[tokio::test]
    async fn test_both_sent_in_order() {
        let provider = Arc::new(RecipientFilter::default());
        let report = dispatcher(Arc::clone(&provider)).dispatch(&request()).await;

        assert!(report.operator.delivered);
        assert!(report.confirmation.delivered);
        assert_eq!(*provider.sent.lock().unwrap(), vec!["owner@example.com", "ana@example.com"]);
        assert_eq!(report.to_result(Locale::Ro), SubmissionResult::accepted());
    }

    #[tokio::test]
    async fn test_operator_failure_still_sends_confirmation() {
        let provider =
            Arc::new(RecipientFilter { failing_recipient: Some("owner@example.com".into()), ..Default::default() });
        let report = dispatcher(Arc::clone(&provider)).dispatch(&request()).await;

        assert!(!report.operator.delivered);
        assert!(report.confirmation.delivered);
        assert_eq!(provider.sent.lock().unwrap().len(), 2);

        let result = report.to_result(Locale::Ro);
        assert!(result.accepted);
        assert!(result.degraded);
        assert_eq!(result.user_message.as_deref(), Some("Nu am putut trimite notificarea către administrator."));
    }

    #[tokio::test]
    async fn test_confirmation_failure_is_degraded() {
        let provider =
            Arc::new(RecipientFilter { failing_recipient: Some("ana@example.com".into()), ..Default::default() });
        let result = dispatcher(provider).dispatch(&request()).await.to_result(Locale::En);

        assert!(result.accepted);
        assert!(result.degraded);
        assert!(result.user_message.unwrap().contains("confirmation email"));
    }

    #[test]
    fn test_both_failed_asks_for_manual_contact() {
        let failed = DeliveryOutcome::failed(ProviderRole::Fallback, "down".into());
        let report = DispatchReport { operator: failed.clone(), confirmation: failed };

        let result = report.to_result(Locale::Ro);

        assert!(result.accepted);
        assert!(result.degraded);
        assert!(result.user_message.unwrap().contains("Te vom contacta în curând"));
    }
}
