//! Monitor response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use taskops_postgres::PgPoolStatus;

/// Greeting returned by the root endpoint.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Welcome {
    /// `Welcome to <name> v<version>`.
    pub message: String,
}

/// System health status response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorStatus {
    /// `ok` when the database answered.
    pub status: String,
    /// Application version.
    pub version: String,
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
    /// Connection pool statistics.
    pub pool: PoolStatus,
}

/// Connection pool statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoolStatus {
    pub max_size: usize,
    pub size: usize,
    pub available: usize,
    pub waiting: usize,
}

impl From<PgPoolStatus> for PoolStatus {
    fn from(status: PgPoolStatus) -> Self {
        Self {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }
}
