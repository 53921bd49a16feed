//! HTTP server startup and graceful shutdown.

use std::future::{Future, IntoFuture, pending};
use std::io;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::{Result, ServerError};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until `shutdown` resolves.
///
/// Once the signal fires, open connections get `shutdown_timeout` to finish
/// before the server stops waiting for them.
pub async fn serve_http<F>(app: Router, config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let server_addr = config.bind_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|source| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %source,
            "failed to bind to address"
        );
        ServerError::Bind {
            address: server_addr.to_string(),
            source,
        }
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "server is ready and listening for connections"
    );

    if config.is_public() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "server is bound to all interfaces, ensure firewall rules are configured"
        );
    }

    let started_at = Instant::now();
    let result = serve_until(listener, app, shutdown, config.shutdown_timeout()).await;
    let uptime_secs = started_at.elapsed().as_secs();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs,
                "server shut down gracefully"
            );
            Ok(())
        }
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %err,
                kind = ?err.kind(),
                uptime_secs,
                "server encountered an error"
            );
            Err(ServerError::Runtime(err))
        }
    }
}

async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (started_tx, mut started_rx) = watch::channel(false);

    let signal = async move {
        shutdown.await;
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            timeout_secs = drain_timeout.as_secs(),
            "graceful shutdown initiated"
        );
        let _ = started_tx.send(true);
    };

    let deadline = async move {
        if started_rx.wait_for(|started| *started).await.is_err() {
            pending::<()>().await;
        }
        tokio::time::sleep(drain_timeout).await;
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .into_future();

    tokio::select! {
        result = server => result,
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                "shutdown timeout elapsed, dropping open connections"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::routing::get;

    use super::*;

    fn ephemeral_config() -> ServerConfig {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            shutdown_timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn stops_when_shutdown_resolves() -> anyhow::Result<()> {
        let app = Router::new().route("/", get(|| async { "ok" }));
        serve_http(app, &ephemeral_config(), async {}).await?;
        Ok(())
    }

    #[tokio::test]
    async fn bind_failure_is_reported() -> anyhow::Result<()> {
        let taken = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let config = ServerConfig {
            port: taken.local_addr()?.port(),
            ..ephemeral_config()
        };

        let result = serve_http(Router::new(), &config, pending::<()>()).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
        Ok(())
    }
}
