//! Pagination request types.

use serde::{Deserialize, Serialize};
use taskops_postgres::query::Pagination as QueryPagination;

/// Offset pagination as `?skip=0&limit=100`.
///
/// Negative values are rejected by deserialization. `limit` is clamped to
/// the largest page the database layer allows.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    /// The number of records to skip.
    pub skip: Option<u32>,
    /// The maximum number of records to return.
    pub limit: Option<u32>,
}

impl Pagination {
    /// Default pagination limit.
    const DEFAULT_LIMIT: u32 = 100;
    /// Default pagination offset.
    const DEFAULT_SKIP: u32 = 0;

    /// Returns the pagination offset.
    pub fn skip(&self) -> u32 {
        self.skip.unwrap_or(Self::DEFAULT_SKIP)
    }

    /// Returns the pagination limit.
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

impl From<Pagination> for QueryPagination {
    fn from(pagination: Pagination) -> Self {
        QueryPagination::new(pagination.limit() as i64, pagination.skip() as i64)
    }
}
