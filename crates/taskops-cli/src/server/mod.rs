//! HTTP server startup and lifecycle.

mod error;
mod http_server;
mod shutdown;

use axum::Router;
pub use error::{Result, ServerError};
use http_server::serve_http;
use shutdown::shutdown_signal;

use crate::config::ServerConfig;

/// Serves `app` until SIGTERM or Ctrl+C, then drains connections.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(app: Router, config: &ServerConfig) -> Result<()> {
    serve_http(app, config, shutdown_signal()).await
}
