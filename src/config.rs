use clap::{Args, Parser, ValueEnum};
use ipnetwork::IpNetwork;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Deployment mode. Preview keeps submissions locally and never sends email.
    #[arg(long, env = "STARCAST_MODE", value_enum, default_value_t = DeployMode::Production)]
    pub mode: DeployMode,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub email: EmailConfig,

    #[command(flatten)]
    pub resend: ResendConfig,

    #[command(flatten)]
    pub smtp: SmtpConfig,

    #[command(flatten)]
    pub local_store: LocalStoreConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeployMode {
    Production,
    Preview,
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Production => "production",
            Self::Preview => "preview",
        })
    }
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "STARCAST_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "STARCAST_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "STARCAST_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight work during shutdown
    #[arg(long, env = "STARCAST_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,

    /// Comma-separated list of CIDRs to trust for X-Forwarded-For IP extraction
    #[arg(
        long,
        env = "STARCAST_TRUSTED_PROXIES",
        default_value = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,127.0.0.1/32",
        value_delimiter = ','
    )]
    pub trusted_proxies: Vec<IpNetwork>,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Submissions per second allowed per client IP
    #[arg(long, env = "STARCAST_RATE_LIMIT_PER_SECOND", default_value_t = 1)]
    pub per_second: u32,

    /// Burst allowance per client IP
    #[arg(long, env = "STARCAST_RATE_LIMIT_BURST", default_value_t = 5)]
    pub burst: u32,
}

#[derive(Clone, Debug, Args)]
pub struct EmailConfig {
    /// Address that receives every new submission
    #[arg(long, env = "STARCAST_OPERATOR_ADDRESS", default_value = "owner@eaglevision.info")]
    pub operator_address: String,

    /// Request timeout for outbound email calls
    #[arg(long, env = "STARCAST_EMAIL_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct ResendConfig {
    /// Resend API key; without it the primary provider is disabled
    #[arg(long = "resend-api-key", env = "RESEND_API_KEY")]
    pub api_key: Option<String>,

    /// Resend API base URL
    #[arg(long = "resend-base-url", env = "STARCAST_RESEND_BASE_URL", default_value = "https://api.resend.com")]
    pub base_url: String,

    /// Default sender for the Resend provider
    #[arg(long = "resend-sender", env = "STARCAST_RESEND_SENDER", default_value = "StarCast <onboarding@resend.dev>")]
    pub sender: String,
}

#[derive(Clone, Debug, Args)]
pub struct SmtpConfig {
    /// SMTP relay host for the fallback provider
    #[arg(id = "smtp_host", long = "smtp-host", env = "STARCAST_SMTP_HOST", default_value = "smtp.gmail.com")]
    pub host: String,

    /// SMTP relay port (implicit TLS)
    #[arg(id = "smtp_port", long = "smtp-port", env = "STARCAST_SMTP_PORT", default_value_t = 465)]
    pub port: u16,

    /// SMTP account; without it the fallback provider is disabled
    #[arg(long = "smtp-user", env = "EMAIL_USER")]
    pub user: Option<String>,

    /// SMTP password or app password
    #[arg(long = "smtp-password", env = "EMAIL_PASSWORD")]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct LocalStoreConfig {
    /// File holding preview submissions
    #[arg(long = "local-store-path", env = "STARCAST_LOCAL_STORE_PATH", default_value = "data/submissions.json")]
    pub path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP collector endpoint; telemetry export is disabled when unset
    #[arg(long, env = "STARCAST_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "STARCAST_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
