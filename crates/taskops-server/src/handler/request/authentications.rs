//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Register {
    /// Email address of the account.
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,

    /// Password of the account.
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// OAuth2 password form used for login.
///
/// Sent as `application/x-www-form-urlencoded`. `username` carries the email.
#[must_use]
#[derive(Serialize, Deserialize)]
pub struct LoginForm {
    /// Email address of the account.
    pub username: String,
    /// Password of the account.
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
