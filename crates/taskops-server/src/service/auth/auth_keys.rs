//! Signing keys for bearer access tokens.
//!
//! Tokens carry two claims, `sub` (the account email) and `exp` (expiry as
//! unix seconds), and are signed with a shared HMAC secret.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::handler::{ErrorKind, Result};
use crate::service::{Result as ServiceResult, ServiceError};

/// Tracing target for token signing and validation.
const TRACING_TARGET: &str = "taskops_server::service::auth::keys";

/// Token signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct AuthKeysConfig {
    /// Shared secret used to sign access tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "secret-key", env = "SECRET_KEY", hide_env_values = true)
    )]
    pub secret_key: String,

    /// HMAC algorithm identifier (HS256, HS384 or HS512).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "algorithm", env = "ALGORITHM", default_value = "HS256")
    )]
    #[serde(default = "AuthKeysConfig::default_algorithm")]
    pub algorithm: String,

    /// Access token lifetime in minutes.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(
            long = "access-token-expire-minutes",
            env = "ACCESS_TOKEN_EXPIRE_MINUTES",
            default_value = "30"
        )
    )]
    #[serde(default = "AuthKeysConfig::default_expire_minutes")]
    pub access_token_expire_minutes: u64,
}

impl AuthKeysConfig {
    /// Creates a configuration with the default algorithm and lifetime.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            algorithm: Self::default_algorithm(),
            access_token_expire_minutes: Self::default_expire_minutes(),
        }
    }

    /// Sets the algorithm identifier.
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Sets the token lifetime in minutes.
    pub fn with_expire_minutes(mut self, minutes: u64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    fn default_algorithm() -> String {
        "HS256".to_owned()
    }

    fn default_expire_minutes() -> u64 {
        30
    }
}

impl fmt::Debug for AuthKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthKeysConfig")
            .field("secret_key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .finish()
    }
}

/// Registered claims of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject, the account email.
    pub sub: String,
    /// Expiration time as unix seconds.
    pub exp: i64,
}

/// Keys used to issue and validate access tokens.
///
/// Built once at startup. Cloning is cheap.
#[derive(Clone)]
pub struct AuthKeys {
    inner: Arc<AuthKeysInner>,
}

struct AuthKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    lifetime: Duration,
}

impl AuthKeys {
    /// Builds the keys from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the secret is empty, the algorithm
    /// is unknown or not an HMAC algorithm, or the lifetime is zero.
    pub fn from_config(config: &AuthKeysConfig) -> ServiceResult<Self> {
        let secret = strip_quotes(&config.secret_key);
        if secret.is_empty() {
            return Err(ServiceError::config("SECRET_KEY must not be empty"));
        }

        let algorithm_name = strip_quotes(&config.algorithm);
        let algorithm = Algorithm::from_str(algorithm_name).map_err(|e| {
            ServiceError::config(format!("Unknown token algorithm {algorithm_name}: {e}"))
        })?;

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ServiceError::config(format!(
                "Token algorithm must be HS256, HS384 or HS512, got {algorithm_name}"
            )));
        }

        if config.access_token_expire_minutes == 0 {
            return Err(ServiceError::config(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be greater than zero",
            ));
        }

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        // `exp` must be strictly in the future.
        validation.reject_tokens_expiring_in_less_than = 1;
        validation.set_required_spec_claims(&["sub", "exp"]);

        tracing::info!(
            target: TRACING_TARGET,
            algorithm = ?algorithm,
            lifetime_minutes = config.access_token_expire_minutes,
            "access token keys loaded"
        );

        let inner = AuthKeysInner {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            validation,
            lifetime: Duration::from_secs(config.access_token_expire_minutes * 60),
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the signing algorithm.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.inner.algorithm
    }

    /// Returns the default token lifetime.
    #[inline]
    pub fn lifetime(&self) -> Duration {
        self.inner.lifetime
    }

    /// Issues a token for the subject with the default lifetime.
    ///
    /// # Errors
    ///
    /// Returns an internal server error if signing fails.
    pub fn issue_token(&self, subject: &str) -> Result<String> {
        self.issue_token_with_lifetime(subject, self.inner.lifetime)
    }

    /// Issues a token for the subject that expires after `lifetime`.
    ///
    /// # Errors
    ///
    /// Returns an internal server error if signing fails.
    pub fn issue_token_with_lifetime(&self, subject: &str, lifetime: Duration) -> Result<String> {
        let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = AuthClaims {
            sub: subject.to_owned(),
            exp: jiff::Timestamp::now().as_second().saturating_add(lifetime),
        };

        self.encode(&claims)
    }

    /// Signs arbitrary claims.
    pub(crate) fn encode(&self, claims: &AuthClaims) -> Result<String> {
        let header = Header::new(self.inner.algorithm);
        encode(&header, claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to sign access token"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_resource("authentication")
        })
    }

    /// Validates a token and returns its subject.
    ///
    /// Every failure (bad signature, malformed, expired, other algorithm,
    /// missing claims) yields `None`.
    pub fn validate_token(&self, token: &str) -> Option<String> {
        match decode::<AuthClaims>(token, &self.inner.decoding_key, &self.inner.validation) {
            Ok(data) => Some(data.claims.sub),
            Err(e) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    reason = ?e.kind(),
                    "access token rejected"
                );
                None
            }
        }
    }
}

impl fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthKeys")
            .field("algorithm", &self.inner.algorithm)
            .field("lifetime", &self.inner.lifetime)
            .finish_non_exhaustive()
    }
}

/// Removes surrounding whitespace and one layer of matching quotes.
fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
