//! Authentication services: password hashing and access token keys.

mod auth_hasher;
mod auth_keys;

pub use auth_hasher::{AuthHasher, MAX_PASSWORD_BYTES};
pub use auth_keys::{AuthClaims, AuthKeys, AuthKeysConfig};
