//! Root greeting and health check handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use taskops_postgres::PgClient;

use crate::extract::Json;
use crate::handler::response::{MonitorStatus, Welcome};
use crate::handler::{ErrorKind, Result};
use crate::service::{AppInfo, ServiceState};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "taskops_server::handler::monitors";

/// Greets the caller with the application name and version.
#[tracing::instrument(skip_all)]
async fn root(State(app_info): State<AppInfo>) -> Json<Welcome> {
    Json(Welcome {
        message: format!("Welcome to {} v{}", app_info.name, app_info.version),
    })
}

/// Reports whether the database pool can hand out a connection.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(pg_client): State<PgClient>,
    State(app_info): State<AppInfo>,
) -> Result<Json<MonitorStatus>> {
    if let Err(e) = pg_client.get_connection().await {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %e,
            "health check failed: database unavailable"
        );

        return Err(ErrorKind::ServiceUnavailable
            .with_message("Database is unavailable")
            .with_resource("health"));
    }

    let pool = pg_client.pool_status();
    tracing::debug!(
        target: TRACING_TARGET,
        pool_size = pool.size,
        pool_available = pool.available,
        under_pressure = pool.is_under_pressure(),
        "health check passed"
    );

    Ok(Json(MonitorStatus {
        status: "ok".to_owned(),
        version: app_info.version,
        checked_at: jiff::Timestamp::now(),
        pool: pool.into(),
    }))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_status))
}
