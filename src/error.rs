//! Crate-level error types

use std::time::Duration;

use tokio_tungstenite::tungstenite;

/// Result alias used across the transport layer
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the server and per-connection tasks
///
/// None of these are fatal to the process. A connection that hits one is
/// torn down and its registry entry removed.
#[derive(Debug)]
pub enum Error {
    /// Socket or listener I/O failure
    Io(std::io::Error),
    /// WebSocket protocol failure (handshake or framing)
    WebSocket(tungstenite::Error),
    /// Client did not complete the WebSocket upgrade in time
    HandshakeTimeout(Duration),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::WebSocket(e) => write!(f, "WebSocket error: {}", e),
            Error::HandshakeTimeout(timeout) => {
                write!(f, "WebSocket handshake timed out after {:?}", timeout)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::WebSocket(e) => Some(e),
            Error::HandshakeTimeout(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<tungstenite::Error> for Error {
    fn from(e: tungstenite::Error) -> Self {
        Error::WebSocket(e)
    }
}
