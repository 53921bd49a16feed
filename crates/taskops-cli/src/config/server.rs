//! Listener address and shutdown settings.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

const SHUTDOWN_TIMEOUT_SECS: RangeInclusive<u64> = 1..=300;

/// Where to listen and how long to drain on shutdown.
///
/// ```bash
/// taskops --host 0.0.0.0 --port 8080
/// HOST=0.0.0.0 PORT=8080 taskops
/// ```
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Unprivileged TCP port.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Seconds open connections get to finish after a shutdown signal.
    #[arg(long = "shutdown-timeout", env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Rejects privileged ports and out-of-range shutdown timeouts.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.port >= 1024,
            "port {} needs root; pick one in 1024-65535",
            self.port
        );
        anyhow::ensure!(
            SHUTDOWN_TIMEOUT_SECS.contains(&self.shutdown_timeout_secs),
            "shutdown timeout must be 1-300 seconds, got {}",
            self.shutdown_timeout_secs
        );
        Ok(())
    }

    #[inline]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[inline]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// True for `0.0.0.0` and `::`.
    #[inline]
    pub fn is_public(&self) -> bool {
        self.host.is_unspecified()
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            bind_addr = %self.bind_addr(),
            shutdown_timeout_secs = self.shutdown_timeout_secs,
            "server configuration"
        );
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            shutdown_timeout_secs: 30,
        }
    }
}
