//! Registry entry types
//!
//! This module defines the per-client handle stored in the registry.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, error::TrySendError};

use super::error::RegistryError;

/// Outbound write capability for one connection
///
/// Cloning is cheap; every clone feeds the same queue, which the owning
/// connection drains into its WebSocket in FIFO order.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    /// Queue of encoded text frames for this client
    tx: mpsc::Sender<String>,

    /// Remote address of the connection
    peer_addr: SocketAddr,

    /// When the connection was accepted
    connected_at: Instant,
}

impl PeerHandle {
    /// Create a handle and the receiving end its connection should drain
    pub fn channel(peer_addr: SocketAddr, capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            tx,
            peer_addr,
            connected_at: Instant::now(),
        };
        (handle, rx)
    }

    /// Enqueue a frame without waiting
    ///
    /// Fails if the queue is full or the connection is gone; the frame is
    /// dropped in both cases.
    pub fn send(&self, frame: String) -> Result<(), RegistryError> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => RegistryError::ChannelFull,
            TrySendError::Closed(_) => RegistryError::ChannelClosed,
        })
    }

    /// Check whether the connection has stopped draining
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Remote address of the connection
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// How long the connection has been registered
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:9000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_send_preserves_order() {
        let (handle, mut rx) = PeerHandle::channel(addr(), 4);

        handle.send("one".into()).unwrap();
        handle.clone().send("two".into()).unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("one"));
        assert_eq!(rx.recv().await.as_deref(), Some("two"));
    }

    #[test]
    fn test_send_full() {
        let (handle, _rx) = PeerHandle::channel(addr(), 1);

        handle.send("first".into()).unwrap();
        assert_eq!(handle.send("second".into()), Err(RegistryError::ChannelFull));
    }

    #[test]
    fn test_send_closed() {
        let (handle, rx) = PeerHandle::channel(addr(), 1);
        drop(rx);

        assert!(handle.is_closed());
        assert_eq!(handle.send("late".into()), Err(RegistryError::ChannelClosed));
    }
}
