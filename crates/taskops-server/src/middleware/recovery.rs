//! Turns panics and request timeouts into `500` JSON errors.

use std::any::Any;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::{BoxError, ServiceBuilder};
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "taskops_server::middleware::recovery";

/// Request deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Seconds a request may run before it is answered with `500`.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "request-timeout", env = "REQUEST_TIMEOUT", default_value_t = 30)
    )]
    pub request_timeout_secs: u64,
}

impl RecoveryConfig {
    pub fn with_timeout_secs(request_timeout_secs: u64) -> Self {
        Self {
            request_timeout_secs,
        }
    }

    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self::with_timeout_secs(30)
    }
}

/// Adds panic recovery and a request deadline to a [`Router`].
pub trait RouterRecoveryExt<S> {
    fn with_recovery(self, config: &RecoveryConfig) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        let recovery = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(timed_out))
            .layer(CatchPanicLayer::custom(panicked))
            .layer(TimeoutLayer::new(config.request_timeout()));

        self.layer(recovery)
    }
}

async fn timed_out(err: BoxError) -> Error<'static> {
    if err.is::<Elapsed>() {
        tracing::error!(target: TRACING_TARGET, "request exceeded its deadline");
        return ErrorKind::InternalServerError.with_message("Request timeout");
    }

    tracing::error!(target: TRACING_TARGET, error = %err, "middleware failed");
    ErrorKind::InternalServerError.into_error()
}

fn panicked(payload: Box<dyn Any + Send + 'static>) -> Response {
    // Handlers may panic with a ready-made error.
    if let Some(error) = payload.downcast_ref::<Error<'static>>() {
        tracing::error!(target: TRACING_TARGET, %error, "handler panicked");
        return error.clone().into_response();
    }

    let reason = match (payload.downcast_ref::<String>(), payload.downcast_ref::<&str>()) {
        (Some(reason), _) => reason.as_str(),
        (None, Some(reason)) => reason,
        (None, None) => "non-string panic payload",
    };
    tracing::error!(target: TRACING_TARGET, reason, "handler panicked");

    ErrorKind::InternalServerError
        .with_message("An unexpected panic occurred")
        .into_response()
}
