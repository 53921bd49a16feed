//! Account model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`Account`] - Registered account with its credential hash
//! - [`NewAccount`] - Data structure for registering a new account

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::accounts;

/// Registered account, the identity every bearer token points at.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Unique account identifier.
    pub id: i64,
    /// Lowercased email address, also used as the token subject.
    pub email: String,
    /// Self-describing PHC password hash.
    pub password_hash: String,
    /// Disabled accounts still authenticate but are denied access.
    pub is_active: bool,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

/// Data for registering a new account.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    /// Email address, normalized by the repository before insertion.
    pub email: String,
    /// Self-describing PHC password hash.
    pub password_hash: String,
}

impl Account {
    /// Returns whether the account may access protected resources.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation time as a [`jiff::Timestamp`].
    #[inline]
    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl NewAccount {
    /// Creates a new account payload.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}
