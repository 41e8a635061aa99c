#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use crate::adapters::email::EmailProvider;
use crate::adapters::email::resend::ResendProvider;
use crate::adapters::email::smtp::SmtpProvider;
use crate::adapters::local_store::LocalSubmissionStore;
use crate::api::ServiceContainer;
use crate::config::{Config, DeployMode};
use crate::services::dispatcher::NotificationDispatcher;
use crate::services::email_gateway::EmailGateway;
use crate::services::health_service::HealthService;
use crate::services::orchestrator::SubmissionOrchestrator;
use crate::services::rate_limit_service::RateLimitService;
use crate::services::recorder::{LocalStoreRecorder, PlaceholderRecorder, SubmissionRecorder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

/// Everything the routers need, wired from one [`Config`].
#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    providers: Option<Vec<Arc<dyn EmailProvider>>>,
    recorder: Option<Arc<dyn SubmissionRecorder>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, providers: None, recorder: None }
    }

    /// Replaces the providers built from configuration. Order is primary first.
    #[must_use]
    pub fn with_email_providers(mut self, providers: Vec<Arc<dyn EmailProvider>>) -> Self {
        self.providers = Some(providers);
        self
    }

    #[must_use]
    pub fn with_recorder(mut self, recorder: Arc<dyn SubmissionRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Wires the submission pipeline.
    ///
    /// # Errors
    /// Returns an error if a configured email provider cannot be constructed.
    pub fn build(self) -> anyhow::Result<App> {
        let config = self.config;
        let timeout = Duration::from_secs(config.email.timeout_secs);

        let providers = match self.providers {
            Some(providers) => providers,
            None => default_providers(&config, timeout)?,
        };
        for provider in &providers {
            if !provider.is_configured() {
                tracing::warn!(provider = provider.name(), "Email provider has no credentials and will be skipped");
            }
        }

        let local_store = Arc::new(LocalSubmissionStore::new(config.local_store.path.clone()));
        let recorder: Arc<dyn SubmissionRecorder> = match (self.recorder, config.mode) {
            (Some(recorder), _) => recorder,
            (None, DeployMode::Production) => Arc::new(PlaceholderRecorder),
            (None, DeployMode::Preview) => Arc::new(LocalStoreRecorder::new(Arc::clone(&local_store))),
        };

        let gateway = EmailGateway::new(providers);
        let dispatcher = NotificationDispatcher::new(gateway.clone(), config.email.operator_address.clone());
        let orchestrator = SubmissionOrchestrator::new(config.mode, recorder, dispatcher);
        let health_service = HealthService::new(config.mode, gateway, Arc::clone(&local_store));
        let rate_limit_service = RateLimitService::new(config.server.trusted_proxies.clone());

        Ok(App { services: ServiceContainer { orchestrator, local_store, rate_limit_service }, health_service })
    }
}

fn default_providers(config: &Config, timeout: Duration) -> anyhow::Result<Vec<Arc<dyn EmailProvider>>> {
    let resend: Arc<dyn EmailProvider> = Arc::new(ResendProvider::new(&config.resend, timeout)?);
    let smtp: Arc<dyn EmailProvider> = Arc::new(SmtpProvider::new(&config.smtp, timeout)?);
    Ok(vec![resend, smtp])
}

/// Routes panics through `tracing` so they reach the configured log sink.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(|l| format!("{}:{}", l.file(), l.line())).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::error!(location = %location, panic = %payload, "Panic occurred");
    }));
}

/// Flips the shutdown flag on Ctrl-C or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
            () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }

        let _ = shutdown_tx.send(true);
    });
}
