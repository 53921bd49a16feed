//! Authenticated identity extractor.
//!
//! [`AuthState`] turns a bearer token into the [`Account`] it names. The
//! token must validate and its subject must resolve to a stored account;
//! every failure produces the same `401 Could not validate credentials`.
//!
//! The resolved state is cached in the request extensions, so later
//! extractors in the same request do not hit the database again.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use taskops_postgres::model::Account;
use taskops_postgres::query::AccountRepository;
use taskops_postgres::{PgClient, PgConnection};

use super::AuthHeader;
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::AuthKeys;

/// Account resolved from a valid bearer token.
///
/// The account may be inactive, see [`ActiveAccount`] for the gated variant.
///
/// [`ActiveAccount`]: crate::extract::ActiveAccount
#[derive(Debug, Clone, Deref, PartialEq)]
pub struct AuthState(pub Account);

impl AuthState {
    /// Resolves a bearer token to the account it names.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Unauthorized`] when the token is invalid or its
    /// subject has no account, and the converted database error when the
    /// lookup itself fails.
    pub async fn resolve<R>(repo: &mut R, auth_keys: &AuthKeys, token: &str) -> Result<Self>
    where
        R: AccountRepository + Send,
    {
        let subject = Self::validate(auth_keys, token)?;
        Self::resolve_subject(repo, &subject).await
    }

    /// Validates the token and returns its subject.
    fn validate(auth_keys: &AuthKeys, token: &str) -> Result<String> {
        auth_keys
            .validate_token(token)
            .ok_or_else(Self::credentials_error)
    }

    /// Looks up the account named by an already validated subject.
    async fn resolve_subject<R>(repo: &mut R, subject: &str) -> Result<Self>
    where
        R: AccountRepository + Send,
    {
        let Some(account) = repo.find_account_by_email(subject).await? else {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                "token subject has no account"
            );
            return Err(Self::credentials_error());
        };

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = account.id,
            "request authenticated"
        );

        Ok(Self(account))
    }

    /// Returns the resolved account.
    #[inline]
    pub fn into_account(self) -> Account {
        self.0
    }

    fn credentials_error() -> Error<'static> {
        ErrorKind::Unauthorized.with_resource("authentication")
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    PgClient: FromRef<S>,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let auth_keys = AuthKeys::from_ref(state);
        let pg_client = PgClient::from_ref(state);

        // Bad tokens are rejected before a connection is taken.
        let subject = Self::validate(&auth_keys, auth_header.token())?;

        let mut conn = pg_client.get_connection().await?;
        let pg: &mut PgConnection = &mut conn;
        let auth_state = Self::resolve_subject(pg, &subject).await?;

        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}
