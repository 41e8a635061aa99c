use crate::config::DeployMode;
use crate::domain::handle;
use crate::domain::locale::{Locale, Notice};
use crate::domain::submission::{Rejection, SubmissionResult};
use crate::services::dispatcher::NotificationDispatcher;
use crate::services::recorder::SubmissionRecorder;
use crate::services::validation;
use futures::FutureExt;
use opentelemetry::{KeyValue, global, metrics::Counter};
use serde_json::Value;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Received,
    Validated,
    Normalized,
    Recorded,
    Notified,
    Completed,
    CompletedDegraded,
    Rejected,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Normalized => "normalized",
            Self::Recorded => "recorded",
            Self::Notified => "notified",
            Self::Completed => "completed",
            Self::CompletedDegraded => "completed_degraded",
            Self::Rejected => "rejected",
        })
    }
}

#[derive(Clone, Debug)]
struct Metrics {
    submissions: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("starcast-server");
        Self {
            submissions: meter
                .u64_counter("submissions_total")
                .with_description("Form submissions by final stage")
                .build(),
        }
    }
}

fn enter(stage: SubmissionStage) {
    tracing::Span::current().record("stage", tracing::field::display(stage));
    tracing::debug!(stage = %stage, "Submission stage reached");
}

/// Runs a form submission from raw payload to the result shown on the page.
#[derive(Clone, Debug)]
pub struct SubmissionOrchestrator {
    mode: DeployMode,
    recorder: Arc<dyn SubmissionRecorder>,
    dispatcher: NotificationDispatcher,
    metrics: Metrics,
}

impl SubmissionOrchestrator {
    #[must_use]
    pub fn new(mode: DeployMode, recorder: Arc<dyn SubmissionRecorder>, dispatcher: NotificationDispatcher) -> Self {
        Self { mode, recorder, dispatcher, metrics: Metrics::new() }
    }

    /// Processes one submission. Always returns a structured result; panics
    /// inside the pipeline become a generic rejection.
    #[tracing::instrument(skip_all, fields(mode = %self.mode, stage = tracing::field::Empty))]
    pub async fn submit(&self, payload: &Value, locale: Locale) -> SubmissionResult {
        let result = match AssertUnwindSafe(self.run(payload, locale)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_owned());
                tracing::error!(error = %detail, "Submission pipeline panicked");
                enter(SubmissionStage::Rejected);
                SubmissionResult::rejected(Rejection::Unexpected, Notice::Unexpected.text(locale).to_owned())
            }
        };

        let outcome = match (result.accepted, result.degraded) {
            (true, false) => "completed",
            (true, true) => "completed_degraded",
            (false, _) => "rejected",
        };
        self.metrics.submissions.add(1, &[KeyValue::new("outcome", outcome)]);

        result
    }

    async fn run(&self, payload: &Value, locale: Locale) -> SubmissionResult {
        enter(SubmissionStage::Received);

        let request = match validation::validate(payload) {
            Ok(request) => request,
            Err(e) => {
                tracing::info!(error = %e, "Submission failed validation");
                enter(SubmissionStage::Rejected);
                return SubmissionResult::rejected(Rejection::Validation, e.user_message(locale));
            }
        };
        enter(SubmissionStage::Validated);

        let Some(normalized) = handle::verify(&request.handle) else {
            tracing::info!(handle = %request.handle, "Handle invalid or nonexistent");
            enter(SubmissionStage::Rejected);
            return SubmissionResult::rejected(Rejection::InvalidHandle, Notice::HandleInvalid.text(locale).to_owned());
        };
        let request = request.with_handle(normalized);
        enter(SubmissionStage::Normalized);

        match self.recorder.record(&request).await {
            Ok(()) => enter(SubmissionStage::Recorded),
            // Preview store writes are best effort.
            Err(e) if self.mode == DeployMode::Preview => {
                tracing::warn!(error = %e, "Preview submission could not be saved locally");
            }
            Err(e) => {
                tracing::error!(error = %e, "Submission could not be recorded");
                enter(SubmissionStage::Rejected);
                return SubmissionResult::rejected(
                    Rejection::Persistence,
                    Notice::RecordingFailed.text(locale).to_owned(),
                );
            }
        }

        if self.mode == DeployMode::Preview {
            self.dispatcher.simulate(&request);
            enter(SubmissionStage::Completed);
            return SubmissionResult::accepted();
        }

        let report = self.dispatcher.dispatch(&request).await;
        enter(SubmissionStage::Notified);

        let result = report.to_result(locale);
        if result.degraded {
            tracing::warn!(
                operator_delivered = report.operator.delivered,
                confirmation_delivered = report.confirmation.delivered,
                "Submission accepted with failed notifications"
            );
            enter(SubmissionStage::CompletedDegraded);
        } else {
            tracing::info!("Submission completed");
            enter(SubmissionStage::Completed);
        }
        result
    }
}
