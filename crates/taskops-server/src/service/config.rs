//! Service state configuration.

#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};
use taskops_postgres::{PgClient, PgConfig};

use crate::service::{AuthHasher, AuthKeys, AuthKeysConfig, Result, ServiceError};

/// Tracing target for service configuration.
const TRACING_TARGET: &str = "taskops_server::service::config";

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Postgres connection and pool configuration.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    pub postgres_config: PgConfig,

    /// Access token signing configuration.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    pub auth_keys_config: AuthKeysConfig,

    /// Application name shown by the root endpoint.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "APP_NAME", default_value = "Agentic TaskOps API")
    )]
    #[serde(default = "ServiceConfig::default_app_name")]
    pub app_name: String,

    /// Application version shown by the root and health endpoints.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "APP_VERSION", default_value = "1.0.0")
    )]
    #[serde(default = "ServiceConfig::default_app_version")]
    pub app_version: String,

    /// Debug mode, also applies pending migrations at startup.
    #[cfg_attr(any(test, feature = "config"), arg(long, env = "DEBUG"))]
    #[serde(default)]
    pub debug: bool,

    /// Applies pending migrations at startup.
    #[cfg_attr(any(test, feature = "config"), arg(long = "migrate", env = "RUN_MIGRATIONS"))]
    #[serde(default)]
    pub migrate: bool,
}

impl ServiceConfig {
    /// Creates a configuration with default application settings.
    pub fn new(postgres_config: PgConfig, auth_keys_config: AuthKeysConfig) -> Self {
        Self {
            postgres_config,
            auth_keys_config,
            app_name: Self::default_app_name(),
            app_version: Self::default_app_version(),
            debug: false,
            migrate: false,
        }
    }

    fn default_app_name() -> String {
        "Agentic TaskOps API".to_owned()
    }

    fn default_app_version() -> String {
        "1.0.0".to_owned()
    }

    /// Returns whether pending migrations are applied at startup.
    #[inline]
    pub fn should_migrate(&self) -> bool {
        self.debug || self.migrate
    }

    /// Creates the Postgres client and applies migrations when enabled.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        self.postgres_config
            .validate()
            .map_err(|e| ServiceError::config(e.to_string()))?;

        let pg_client = self
            .postgres_config
            .clone()
            .build()
            .map_err(|e| ServiceError::database("could not create the database client", e))?;

        if self.should_migrate() {
            let applied = taskops_postgres::run_pending_migrations(&pg_client)
                .await
                .map_err(|e| ServiceError::database("could not apply migrations", e))?;

            tracing::info!(
                target: TRACING_TARGET,
                applied = applied.len(),
                "database migrations applied"
            );
        }

        Ok(pg_client)
    }

    /// Creates the password hasher.
    #[inline]
    pub fn create_password_hasher(&self) -> Result<AuthHasher> {
        AuthHasher::new()
    }

    /// Builds the access token keys.
    #[inline]
    pub fn load_auth_keys(&self) -> Result<AuthKeys> {
        AuthKeys::from_config(&self.auth_keys_config)
    }
}
