//! Active-account extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use taskops_postgres::PgClient;
use taskops_postgres::model::Account;

use super::{AuthProvider, AuthState};
use crate::handler::{Error, Result};
use crate::service::AuthKeys;

/// An authenticated account that passed the active gate.
///
/// Rejects with `401` like [`AuthState`] when the token does not resolve,
/// and with `403 Inactive user` when the account is disabled.
#[derive(Debug, Clone, Deref, PartialEq)]
pub struct ActiveAccount(pub Account);

impl ActiveAccount {
    /// Applies the active gate to a resolved identity.
    pub fn from_auth_state(auth_state: AuthState) -> Result<Self> {
        auth_state.authorize_active()?;
        Ok(Self(auth_state.into_account()))
    }
}

impl AuthProvider for AuthState {
    #[inline]
    fn account(&self) -> &Account {
        &self.0
    }
}

impl AuthProvider for ActiveAccount {
    #[inline]
    fn account(&self) -> &Account {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ActiveAccount
where
    S: Sync + Send,
    PgClient: FromRef<S>,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_request_parts(parts, state).await?;
        Self::from_auth_state(auth_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::auth::fakes::account;
    use crate::handler::ErrorKind;

    #[test]
    fn gate_passes_active_accounts() -> anyhow::Result<()> {
        let state = AuthState(account(1, "alice@example.com", true));
        let active = ActiveAccount::from_auth_state(state)?;
        assert_eq!(active.account_id(), 1);
        Ok(())
    }

    #[test]
    fn gate_rejects_inactive_accounts() {
        let state = AuthState(account(2, "idle@example.com", false));
        let error = ActiveAccount::from_auth_state(state).err();
        assert_eq!(error.map(|e| e.kind()), Some(ErrorKind::Forbidden));
    }
}
