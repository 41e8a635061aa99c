#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, missing_debug_implementations, unreachable_pub)]
use async_trait::async_trait;
use serde_json::{Value, json};
use starcast_server::adapters::email::{DeliveryError, EmailProvider};
use starcast_server::api::MgmtState;
use starcast_server::config::{
    Config, DeployMode, EmailConfig, LocalStoreConfig, LogFormat, RateLimitConfig, ResendConfig, ServerConfig,
    SmtpConfig, TelemetryConfig,
};
use starcast_server::domain::email::EmailMessage;
use starcast_server::{AppBuilder, api};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("starcast_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn temp_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("starcast-it-{}.json", uuid::Uuid::new_v4()))
}

pub fn get_test_config() -> Config {
    Config {
        mode: DeployMode::Production,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
            trusted_proxies: vec!["10.0.0.0/8".parse().unwrap()],
        },
        rate_limit: RateLimitConfig { per_second: 10_000, burst: 10_000 },
        email: EmailConfig { operator_address: "owner@example.com".to_string(), timeout_secs: 5 },
        resend: ResendConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            sender: "StarCast <onboarding@resend.dev>".to_string(),
        },
        smtp: SmtpConfig { host: "smtp.example.com".to_string(), port: 465, user: None, password: None },
        local_store: LocalStoreConfig { path: temp_store_path() },
        telemetry: TelemetryConfig { otlp_endpoint: None, log_format: LogFormat::Text },
    }
}

pub fn valid_payload() -> Value {
    json!({
        "name": "Ana",
        "surname": "Pop",
        "email": "ana@example.com",
        "handle": "ana.pop",
        "category": "signup",
    })
}

/// Records every message it is asked to send and succeeds or fails on demand.
#[derive(Debug)]
pub struct MockProvider {
    name: &'static str,
    succeed: bool,
    calls: AtomicUsize,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockProvider {
    pub fn working(name: &'static str) -> Arc<Self> {
        Arc::new(Self { name, succeed: true, calls: AtomicUsize::new(0), sent: Mutex::new(Vec::new()) })
    }

    pub fn broken(name: &'static str) -> Arc<Self> {
        Arc::new(Self { name, succeed: false, calls: AtomicUsize::new(0), sent: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.succeed
    }

    async fn send(&self, message: &EmailMessage) -> Result<String, DeliveryError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.succeed {
            return Err(DeliveryError::MissingCredentials(self.name));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(format!("{}-{n}", self.name))
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(get_test_config(), vec![MockProvider::working("primary")]).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        setup_tracing();
        let app = AppBuilder::new(config.clone()).build().expect("Failed to build app");
        Self::serve(config, app).await
    }

    pub async fn spawn_with(config: Config, providers: Vec<Arc<MockProvider>>) -> Self {
        setup_tracing();
        let providers: Vec<Arc<dyn EmailProvider>> =
            providers.into_iter().map(|p| p as Arc<dyn EmailProvider>).collect();
        let app = AppBuilder::new(config.clone()).with_email_providers(providers).build().expect("Failed to build app");
        Self::serve(config, app).await
    }

    async fn serve(config: Config, app: starcast_server::App) -> Self {
        let api_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        let app_router = api::app_router(config.clone(), app.services);
        let mgmt_router = api::mgmt_router(MgmtState { health_service: app.health_service });

        tokio::spawn(async move {
            axum::serve(api_listener, app_router.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_router.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), config }
    }

    pub async fn submit(&self, payload: &Value) -> reqwest::Response {
        self.client.post(format!("{}/v1/submissions", self.server_url)).json(payload).send().await.unwrap()
    }

    pub fn cleanup(&self) {
        let _ = std::fs::remove_file(&self.config.local_store.path);
    }
}
