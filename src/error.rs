//! Error taxonomy.
//!
//! Only startup failures surface as [`ServerError`]; everything that
//! happens after the socket is bound is contained per connection or per
//! request and answered on the wire instead.

use std::net::SocketAddr;

use thiserror::Error;

/// Fatal startup errors. The process reports these to the operator and
/// exits before (or while) binding.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration loaded but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured host/port pair did not resolve to a socket address.
    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// The listening socket could not be created or bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Opaque failure signalled by the application handler.
///
/// The server never looks inside beyond logging it; every handler
/// failure maps to a generic server-error response and the connection
/// stays usable.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for HandlerError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_error_displays_message() {
        let err = HandlerError::new("database unavailable");
        assert_eq!(err.to_string(), "database unavailable");
    }

    #[test]
    fn handler_error_from_boxed() {
        let io: Box<dyn std::error::Error + Send + Sync> =
            Box::new(std::io::Error::other("boom"));
        let err = HandlerError::from(io);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn bind_error_names_the_address() {
        let err = ServerError::Bind {
            addr: "127.0.0.1:80".parse().unwrap(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(err.to_string().contains("127.0.0.1:80"));
    }
}
