//! Account storage: registration, lookups and the active flag.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Account, NewAccount};
use crate::{PgConnection, PgError, PgResult, schema};

/// Account queries.
///
/// Every email passed in is trimmed and lowercased first, matching the
/// `accounts_email_lowercase` check.
pub trait AccountRepository {
    /// Inserts an account. A taken email fails on `accounts_email_unique_idx`.
    fn create_account(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Case-insensitive lookup.
    fn find_account_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    fn email_exists(&mut self, email: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Flips `is_active`. `None` when no such account exists.
    fn set_account_active(
        &mut self,
        account_id: i64,
        is_active: bool,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, mut new_account: NewAccount) -> PgResult<Account> {
        new_account.email = normalize_email(&new_account.email);

        diesel::insert_into(schema::accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_account_by_email(&mut self, email: &str) -> PgResult<Option<Account>> {
        let email = normalize_email(email);
        schema::accounts::table
            .filter(schema::accounts::email.eq(email))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn email_exists(&mut self, email: &str) -> PgResult<bool> {
        let email = normalize_email(email);
        let query = schema::accounts::table.filter(schema::accounts::email.eq(email));

        diesel::select(diesel::dsl::exists(query))
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn set_account_active(
        &mut self,
        account_id: i64,
        is_active: bool,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::dsl;

        diesel::update(dsl::accounts.find(account_id))
            .set(dsl::is_active.eq(is_active))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}

/// Canonical form used for storage and comparison.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
    }
}
