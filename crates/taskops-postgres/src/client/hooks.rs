//! Connection setup and pool lifecycle hooks.

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::pg_config::mask_url;
use crate::TRACING_TARGET_CONNECTION;

/// Opens a connection and logs how long the handshake took.
///
/// Installed as the manager's `custom_setup`.
pub(super) fn establish<C>(url: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    async move {
        let started = Instant::now();
        let result = C::establish(url).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if let Err(err) = &result {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                database_url = %mask_url(url),
                elapsed_ms,
                error = %err,
                "could not connect to postgres"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                elapsed_ms,
                "opened postgres connection"
            );
        }

        result
    }
    .boxed()
}

pub(super) fn on_create(conn: &mut AsyncPgConnection, _: &Metrics) -> HookResult<PoolError> {
    tracing::trace!(
        target: TRACING_TARGET_CONNECTION,
        broken = conn.is_broken(),
        "connection joined the pool"
    );
    Ok(())
}

/// Flags connections that broke while checked out.
pub(super) fn on_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            reuses = metrics.recycle_count,
            age = ?metrics.age(),
            "returned connection is broken"
        );
    }
    Ok(())
}
