//! Shutdown signals.

use std::io;

use tokio::signal;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Resolves on Ctrl+C or, on unix, SIGTERM.
///
/// A signal whose handler cannot be installed never fires, so the other one
/// still works.
pub async fn shutdown_signal() {
    let interrupt = wait_for("SIGINT", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{SignalKind, signal as unix_signal};
        match unix_signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                let received = async { stream.recv().await.ok_or_else(closed) };
                wait_for("SIGTERM", received).await;
            }
            Err(err) => never_fires("SIGTERM", err).await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }
}

async fn wait_for(name: &'static str, signal: impl Future<Output = io::Result<()>>) {
    match signal.await {
        Ok(()) => tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            signal = name,
            "shutdown requested"
        ),
        Err(err) => never_fires(name, err).await,
    }
}

async fn never_fires(name: &'static str, err: io::Error) {
    tracing::error!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal = name,
        error = %err,
        "cannot listen for signal"
    );
    std::future::pending::<()>().await
}

#[cfg(unix)]
fn closed() -> io::Error {
    io::Error::other("signal stream closed")
}
