//! Authentication response types.

use serde::{Deserialize, Serialize};

/// Response returned after a successful login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
}

impl AuthToken {
    /// Wraps a signed token as a bearer token response.
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_owned(),
        }
    }
}
