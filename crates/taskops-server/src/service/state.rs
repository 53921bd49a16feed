//! Application state and dependency injection.

use taskops_postgres::PgClient;

use crate::service::{AuthHasher, AuthKeys, Result, ServiceConfig};

/// Name and version reported by the root and health endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,

    auth_hasher: AuthHasher,
    auth_keys: AuthKeys,
    app_info: AppInfo,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Creates the database pool, applying migrations when enabled, and
    /// builds the authentication services.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service_state = Self {
            pg_client: config.connect_postgres().await?,

            auth_hasher: config.create_password_hasher()?,
            auth_keys: config.load_auth_keys()?,
            app_info: AppInfo {
                name: config.app_name.clone(),
                version: config.app_version.clone(),
            },
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);

impl_di!(auth_hasher: AuthHasher);
impl_di!(auth_keys: AuthKeys);
impl_di!(app_info: AppInfo);
