use crate::adapters::local_store::LocalSubmissionStore;
use crate::config::DeployMode;
use crate::services::email_gateway::EmailGateway;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("starcast-server");
        Self {
            status: meter
                .i64_gauge("starcast_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    mode: DeployMode,
    gateway: EmailGateway,
    store: Arc<LocalSubmissionStore>,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(mode: DeployMode, gateway: EmailGateway, store: Arc<LocalSubmissionStore>) -> Self {
        Self { mode, gateway, store, metrics: Metrics::new() }
    }

    #[must_use]
    pub const fn mode(&self) -> DeployMode {
        self.mode
    }

    /// Lists every provider with whether it holds credentials.
    #[must_use]
    pub fn check_providers(&self) -> Vec<(&'static str, bool)> {
        let providers: Vec<_> = self.gateway.providers().iter().map(|p| (p.name(), p.is_configured())).collect();
        for (name, configured) in &providers {
            self.metrics.status.record(i64::from(*configured), &[KeyValue::new("component", *name)]);
        }
        providers
    }

    /// Checks that the local submission store can be read.
    ///
    /// # Errors
    /// Returns a string describing the failure if the store is unreadable.
    pub async fn check_local_store(&self) -> Result<(), String> {
        match self.store.check().await {
            Ok(()) => {
                self.metrics.status.record(1, &[KeyValue::new("component", "local_store")]);
                Ok(())
            }
            Err(e) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "local_store")]);
                Err(format!("Local store check failed for {}: {e}", self.store.path().display()))
            }
        }
    }
}
