//! Repository traits implemented for [`PgConnection`].
//!
//! Handlers only see the traits, which keeps them testable against an
//! in-memory implementation.
//!
//! [`PgConnection`]: crate::PgConnection

mod account;
mod task;

use serde::{Deserialize, Serialize};

pub use self::account::AccountRepository;
pub use self::task::TaskRepository;

/// `LIMIT`/`OFFSET` of a list query. Always within bounds once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub const MAX_LIMIT: i64 = 1000;
    pub const DEFAULT_LIMIT: i64 = 100;

    /// Clamps `limit` to `1..=MAX_LIMIT` and `offset` to be non-negative.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset: offset.max(0),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_values_are_kept() {
        assert_eq!(Pagination::new(25, 100), Pagination { limit: 25, offset: 100 });
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(Pagination::new(0, 0).limit, 1);
        assert_eq!(Pagination::new(5_000, 0).limit, Pagination::MAX_LIMIT);
        assert_eq!(Pagination::new(10, -3).offset, 0);
    }

    #[test]
    fn default_is_first_hundred() {
        assert_eq!(Pagination::default(), Pagination { limit: 100, offset: 0 });
    }
}
