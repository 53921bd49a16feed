//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig      # Host, port, shutdown
//! ├── recovery: RecoveryConfig  # Request timeout
//! └── service: ServiceConfig    # Database, auth keys, app info
//! ```
//!
//! Every option can be given as an argument or an environment variable.

mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use taskops_server::middleware::RecoveryConfig;
use taskops_server::service::ServiceConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "taskops")]
#[command(about = "TaskOps multi-user task tracker server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Panic and timeout recovery configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Database, token and application configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Loads the `.env` file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Falls back to `info` when `RUST_LOG` is unset or invalid.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self.log_format {
            LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
        }
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        Ok(())
    }

    /// Logs configuration without secrets.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            dotenv = cfg!(feature = "dotenv"),
            "build information"
        );

        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout_secs,
            "recovery configuration"
        );

        let postgres = &self.service.postgres_config;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            database_url = %postgres.masked_url(),
            pool_size = postgres.pool_size,
            connect_timeout_secs = ?postgres.connect_timeout_secs,
            idle_timeout_secs = ?postgres.idle_timeout_secs,
            "database configuration"
        );

        let auth = &self.service.auth_keys_config;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            app_name = %self.service.app_name,
            app_version = %self.service.app_version,
            debug = self.service.debug,
            migrate = self.service.should_migrate(),
            algorithm = %auth.algorithm,
            access_token_expire_minutes = auth.access_token_expire_minutes,
            "service configuration"
        );
    }
}
