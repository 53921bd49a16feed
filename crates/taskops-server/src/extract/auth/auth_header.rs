//! Bearer token extraction from the `Authorization` header.

use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};

/// Raw bearer token presented by the client.
///
/// Nothing about the token is checked here, see [`AuthState`] for
/// validation.
///
/// [`AuthState`]: crate::extract::AuthState
#[must_use]
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader(String);

impl AuthHeader {
    /// Wraps a raw token.
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[inline]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthHeader").field(&"[REDACTED]").finish()
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(bearer)) => Ok(Self::new(bearer.token())),
            Err(rejection) => {
                match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => {
                        tracing::debug!(
                            target: TRACING_TARGET_AUTHENTICATION,
                            "missing authorization header"
                        );
                    }
                    _ => {
                        tracing::debug!(
                            target: TRACING_TARGET_AUTHENTICATION,
                            "authorization header is not a bearer token"
                        );
                    }
                }

                Err(ErrorKind::MissingAuthToken.with_resource("authentication"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use axum::http::header::AUTHORIZATION;

    use super::*;

    async fn extract(header: Option<&str>) -> Result<AuthHeader> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }

        let (mut parts, ()) = builder
            .body(())
            .map_err(|_| ErrorKind::InternalServerError.into_error())?
            .into_parts();
        AuthHeader::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_bearer_token() -> anyhow::Result<()> {
        let header = extract(Some("Bearer abc.def.ghi")).await?;
        assert_eq!(header.token(), "abc.def.ghi");
        Ok(())
    }

    #[tokio::test]
    async fn missing_or_non_bearer_header_is_rejected() {
        for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer")] {
            let error = extract(header).await.err();
            assert_eq!(
                error.map(|e| e.kind()),
                Some(ErrorKind::MissingAuthToken),
                "{header:?}"
            );
        }
    }

    #[test]
    fn debug_hides_token() {
        let header = AuthHeader::new("secret-token");
        assert!(!format!("{header:?}").contains("secret-token"));
    }
}
