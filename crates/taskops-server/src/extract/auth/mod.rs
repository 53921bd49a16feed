//! Authentication and authorization extractors.
//!
//! A protected request moves through three composable stages:
//!
//! - [`AuthHeader`] pulls the bearer token out of `Authorization`.
//! - [`AuthState`] validates it and resolves the account it names.
//! - [`ActiveAccount`] additionally requires the account to be active.
//!
//! Ownership of individual tasks is checked through [`AuthProvider`].

mod active_account;
mod auth_header;
mod auth_provider;
mod auth_state;
#[cfg(test)]
pub(crate) mod fakes;

pub use self::active_account::ActiveAccount;
pub use self::auth_header::AuthHeader;
pub(crate) use self::auth_provider::task_not_found;
pub use self::auth_provider::AuthProvider;
pub use self::auth_state::AuthState;
