//! Password hashing and verification using Argon2id.
//!
//! Passwords are truncated to their first [`MAX_PASSWORD_BYTES`] bytes before
//! hashing and before verification, so a longer password and its prefix are
//! equivalent inputs.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};

use crate::handler::{ErrorKind, Result};
use crate::service::{Result as ServiceResult, ServiceError};

/// Tracing target for password hashing.
const TRACING_TARGET: &str = "taskops_server::service::auth::hasher";

/// Number of password bytes that take part in hashing.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Verified against when the account does not exist.
const DUMMY_PASSWORD: &str = "taskops-dummy-password-for-timing";

/// Password hashing service.
///
/// Uses Argon2id with 19 MiB memory, 2 iterations and 1 lane. Cloning is
/// cheap.
#[derive(Clone)]
pub struct AuthHasher {
    inner: Arc<AuthHasherInner>,
}

struct AuthHasherInner {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl AuthHasher {
    /// Creates a new password hashing service.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the Argon2 parameters are rejected or
    /// the dummy hash cannot be computed.
    pub fn new() -> ServiceResult<Self> {
        let params = Params::new(19456, 2, 1, None).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to create argon2 parameters"
            );
            ServiceError::config("Invalid password hashing configuration")
        })?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, DUMMY_PASSWORD).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to precompute dummy password hash"
            );
            ServiceError::config("Invalid password hashing configuration")
        })?;

        tracing::debug!(target: TRACING_TARGET, "password hasher initialized");

        Ok(Self {
            inner: Arc::new(AuthHasherInner { argon2, dummy_hash }),
        })
    }

    /// Hashes a password into a PHC string with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns an internal server error if hashing fails.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash_with(&self.inner.argon2, password).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "password hashing failed"
            );
            ErrorKind::InternalServerError.with_message("Password processing failed")
        })
    }

    /// Checks a password against a stored PHC hash.
    ///
    /// A malformed `stored_hash` yields `false`.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(parsed_hash) => parsed_hash,
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %e,
                    "stored password hash is malformed"
                );
                return false;
            }
        };

        match self
            .inner
            .argon2
            .verify_password(truncate(password), &parsed_hash)
        {
            Ok(()) => true,
            Err(ArgonError::Password) => {
                tracing::debug!(target: TRACING_TARGET, "password mismatch");
                false
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification failed"
                );
                false
            }
        }
    }

    /// Runs one verification against a precomputed hash.
    ///
    /// Used when the account does not exist, so that path costs the same as
    /// a wrong password. Always returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let _ = self.verify_password(password, &self.inner.dummy_hash);
        false
    }
}

impl std::fmt::Debug for AuthHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHasher")
            .field("algorithm", &Algorithm::Argon2id)
            .finish_non_exhaustive()
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, ArgonError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2.hash_password(truncate(password), &salt)?;
    Ok(hash.to_string())
}

/// Returns at most the first [`MAX_PASSWORD_BYTES`] bytes of the password.
fn truncate(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)]
}
