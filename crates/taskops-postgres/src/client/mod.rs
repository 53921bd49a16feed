//! Pooled Postgres client, its config and the migration runner.

mod hooks;
mod migrate;
mod pg_client;
mod pg_config;

use deadpool::managed::{Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;

pub use self::migrate::run_pending_migrations;
pub use self::pg_client::{PgClient, PgConn, PgPoolStatus};
pub use self::pg_config::PgConfig;

type Manager = AsyncDieselConnectionManager<AsyncPgConnection>;

/// The deadpool pool behind [`PgClient`].
pub type ConnectionPool = Pool<Manager>;

/// A checked-out connection; returns to the pool on drop.
pub type PooledConnection = Object<Manager>;
