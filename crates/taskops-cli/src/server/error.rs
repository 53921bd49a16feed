//! Server error types.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type Result<T, E = ServerError> = std::result::Result<T, E>;

/// Errors raised while binding or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Provides a human-readable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        let source = match self {
            Self::Bind { source, .. } | Self::Runtime(source) => source,
        };

        match source.kind() {
            io::ErrorKind::PermissionDenied => {
                Some("Try using a port above 1024 or run with appropriate privileges")
            }
            io::ErrorKind::AddrInUse => {
                Some("The port is already in use. Try a different port or stop the conflicting service")
            }
            io::ErrorKind::AddrNotAvailable => {
                Some("The address is not available. Check network interface configuration")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_errors_carry_address_and_suggestion() {
        let error = ServerError::Bind {
            address: "127.0.0.1:8000".to_owned(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };

        assert!(error.to_string().contains("127.0.0.1:8000"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn unknown_runtime_errors_have_no_suggestion() {
        let error = ServerError::Runtime(io::Error::other("boom"));
        assert!(error.suggestion().is_none());
    }
}
