//! Errors raised while the service state is being assembled.

use std::borrow::Cow;

use taskops_postgres::PgError;

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Startup failure. Request-time failures use [`handler::Error`] instead.
///
/// [`handler::Error`]: crate::handler::Error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A setting was rejected before anything was started.
    #[error("invalid configuration: {0}")]
    Config(Cow<'static, str>),

    /// The database client could not be created or migrated.
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: PgError,
    },
}

impl ServiceError {
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(message.into())
    }

    pub fn database(context: &'static str, source: PgError) -> Self {
        Self::Database { context, source }
    }
}
