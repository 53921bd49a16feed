//! Applies the embedded migrations.

use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Brings the schema up to date and returns the versions that were applied.
///
/// Diesel's harness is blocking, so it runs on a blocking thread through an
/// [`AsyncConnectionWrapper`].
pub async fn run_pending_migrations(pg_client: &PgClient) -> PgResult<Vec<String>> {
    let started = Instant::now();
    let mut conn: AsyncConnectionWrapper<_> = pg_client.checkout().await?.into();

    let applied = tokio::task::spawn_blocking(move || {
        let versions = conn.run_pending_migrations(MIGRATIONS)?;
        Ok::<_, crate::error::BoxError>(versions.iter().map(ToString::to_string).collect::<Vec<_>>())
    })
    .await
    .map_err(|join_err| PgError::Migration(join_err.into()))?
    .map_err(PgError::Migration);

    match &applied {
        Ok(versions) => tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            applied = versions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "schema is up to date"
        ),
        Err(err) => tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %err,
            "schema migration failed"
        ),
    }

    applied
}
