//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Private routes (tasks and the agent stream) sit behind the
//! [`require_active_account`] route layer. Public routes cover
//! registration, login, the root greeting and the health check.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler
//! [`require_active_account`]: crate::middleware::require_active_account

mod agent;
mod authentication;
mod error;
mod monitors;
pub mod request;
pub mod response;
mod tasks;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::require_active_account;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all private routes.
fn private_routes() -> Router<ServiceState> {
    Router::new()
        .merge(tasks::routes())
        .merge(agent::routes())
}

/// Returns a [`Router`] with all public routes.
fn public_routes() -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(monitors::routes())
}

/// Returns a [`Router`] with all routes.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let require_active_account = from_fn_with_state(state, require_active_account);

    let private_router = private_routes().route_layer(require_active_account);

    Router::new()
        .merge(private_router)
        .merge(public_routes())
        .fallback(fallback)
}
