//! Registry error types
//!
//! Error types for identity lookup and delivery to a client's queue.

use super::id::ClientId;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No live client holds this identity
    ClientNotFound(ClientId),
    /// Client's outbound queue is full
    ChannelFull,
    /// Client's connection has stopped draining its queue
    ChannelClosed,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::ClientNotFound(id) => write!(f, "Client not found: {}", id),
            RegistryError::ChannelFull => write!(f, "Outbound queue full"),
            RegistryError::ChannelClosed => write!(f, "Outbound queue closed"),
        }
    }
}

impl std::error::Error for RegistryError {}
