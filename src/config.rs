use clap::{Args, Parser, ValueEnum};
use ipnetwork::IpNetwork;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub storage: StorageConfig,

    #[command(flatten)]
    pub chat: ChatConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "HOMECHAT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the chat API and browser UI
    #[arg(long, env = "HOMECHAT_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Port for the liveness/readiness endpoints
    #[arg(long, env = "HOMECHAT_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight requests after a shutdown signal
    #[arg(long, env = "HOMECHAT_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,

    /// Comma-separated list of CIDRs to trust for X-Forwarded-For IP extraction
    #[arg(
        long,
        env = "HOMECHAT_TRUSTED_PROXIES",
        default_value = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,127.0.0.1/32",
        value_delimiter = ','
    )]
    pub trusted_proxies: Vec<IpNetwork>,
}

#[derive(Clone, Debug, Args)]
pub struct StorageConfig {
    /// PostgreSQL connection URL. The in-memory store is used when unset.
    #[arg(long, env = "HOMECHAT_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "HOMECHAT_DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,
}

#[derive(Clone, Debug, Args)]
pub struct ChatConfig {
    /// Comma-separated list of the usernames admitted to the chat
    #[arg(long, env = "HOMECHAT_ALLOWED_USERS", default_value = "akshu,paru", value_delimiter = ',')]
    pub allowed_users: Vec<String>,

    /// Maximum length of a single message, in characters
    #[arg(long, env = "HOMECHAT_MAX_MESSAGE_CHARS", default_value_t = 2000)]
    pub max_message_chars: usize,
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed for the message endpoints
    #[arg(long, env = "HOMECHAT_RATE_LIMIT_PER_SECOND", default_value_t = 20)]
    pub per_second: u32,

    /// Burst allowance for the message endpoints
    #[arg(long, env = "HOMECHAT_RATE_LIMIT_BURST", default_value_t = 40)]
    pub burst: u32,

    /// Requests per second allowed for login
    #[arg(long, env = "HOMECHAT_LOGIN_RATE_LIMIT_PER_SECOND", default_value_t = 1)]
    pub login_per_second: u32,

    /// Burst allowance for login
    #[arg(long, env = "HOMECHAT_LOGIN_RATE_LIMIT_BURST", default_value_t = 5)]
    pub login_burst: u32,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the store readiness check
    #[arg(long, env = "HOMECHAT_HEALTH_STORE_TIMEOUT_MS", default_value_t = 2000)]
    pub store_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// OTLP collector endpoint (gRPC). Export is disabled when unset.
    #[arg(long, env = "HOMECHAT_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Log output format
    #[arg(long, env = "HOMECHAT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, env = "HOMECHAT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

/// Settings for the `homechat` terminal client.
#[derive(Clone, Debug, Parser)]
#[command(name = "homechat", version, about = "Terminal client for homechat", long_about = None)]
pub struct ClientConfig {
    /// Base URL of the chat server
    #[arg(long, env = "HOMECHAT_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    pub server_url: String,

    /// Log in as this user instead of prompting
    #[arg(long, short)]
    pub username: Option<String>,

    /// File that keeps the session across client restarts. Without it the session ends with the process.
    #[arg(long, env = "HOMECHAT_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// How often to re-fetch the conversation
    #[arg(long, env = "HOMECHAT_POLL_INTERVAL_MS", default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Per-request timeout
    #[arg(long, env = "HOMECHAT_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Width used to right-align your own messages
    #[arg(long, default_value_t = 72)]
    pub width: usize,
}

impl ClientConfig {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
