//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - [`require_active_account`] guards the private routes.
//! - [`RouterObservabilityExt`] adds request ids and request tracing.
//! - [`RouterRecoveryExt`] turns panics and timeouts into `500` responses.

mod auth;
mod observability;
mod recovery;

pub use auth::require_active_account;
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
