#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
pub mod error;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, PgClient, PgConfig, PgConn, PgPoolStatus, PooledConnection,
    run_pending_migrations,
};
pub use crate::error::{PgError, PgResult};

/// Migrations under `src/migrations`, compiled into the binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!("./src/migrations");

/// Tracing target for errors raised by the client itself.
pub const TRACING_TARGET_CLIENT: &str = "taskops_postgres::client";

/// Tracing target for schema migrations.
pub const TRACING_TARGET_MIGRATION: &str = "taskops_postgres::migrations";

/// Tracing target for connection setup and pool checkouts.
pub const TRACING_TARGET_CONNECTION: &str = "taskops_postgres::connection";
