//! Account response types.

use serde::{Deserialize, Serialize};
use taskops_postgres::model;

/// Public view of an account. Never carries the password hash.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// ID of the account.
    pub id: i64,
    /// Email address of the account.
    pub email: String,
    /// Whether the account may access protected resources.
    pub is_active: bool,
}

impl From<model::Account> for Account {
    fn from(account: model::Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            is_active: account.is_active,
        }
    }
}
