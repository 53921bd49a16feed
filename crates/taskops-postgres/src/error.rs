//! [`PgError`] and the driver error types it wraps.

use std::borrow::Cow;

pub use deadpool::managed::TimeoutType;
use diesel::result::DatabaseErrorKind;
pub use diesel::result::{ConnectionError as DieselConnectionError, Error as DieselError};
pub use diesel_async::pooled_connection::PoolError as DieselPoolError;
pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

use crate::TRACING_TARGET_CLIENT;
use crate::types::ConstraintViolation;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Anything that can go wrong between the pool and a finished query.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled"]
pub enum PgError {
    #[error("invalid database config: {0}")]
    Config(String),

    /// No connection became available in time.
    #[error("timed out waiting on the connection pool")]
    Timeout(TimeoutType),

    #[error("database connection failed: {0}")]
    Connection(#[from] DieselConnectionError),

    #[error("migration failed: {0}")]
    Migration(BoxError),

    /// The statement ran and was rejected, constraint violations included.
    #[error("query failed: {0}")]
    Query(#[from] DieselError),

    #[error("unexpected database error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Name of the violated constraint, if the database reported one.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::Query(DieselError::DatabaseError(_, info)) => info.constraint_name(),
            _ => None,
        }
    }

    /// Maps the violated constraint onto a [`ConstraintViolation`] this crate knows.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Query(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        )
    }

    /// The database is unreachable rather than rejecting the request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Connection(DieselConnectionError::BadConnection(_))
        )
    }
}

impl From<DeadpoolError> for PgError {
    fn from(err: DeadpoolError) -> Self {
        match err {
            DeadpoolError::Timeout(kind) => Self::Timeout(kind),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(err)) => Self::Connection(err),
            DeadpoolError::Backend(DieselPoolError::QueryError(err)) => Self::Query(err),
            DeadpoolError::Closed => Self::Connection(DieselConnectionError::BadConnection(
                "connection pool is closed".to_owned(),
            )),
            other => {
                tracing::error!(target: TRACING_TARGET_CLIENT, error = %other, "pool misconfigured");
                Self::Unexpected(other.to_string().into())
            }
        }
    }
}

/// Result alias for database calls.
pub type PgResult<T, E = PgError> = Result<T, E>;
