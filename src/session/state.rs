//! Connection state machine
//!
//! Tracks a connection from accept to teardown:
//!
//! ```text
//! Connecting ──open(id)──► Open ──close()──► Closed
//!      │                                       ▲
//!      └────────────────close()────────────────┘
//! ```
//!
//! `close` hands back the identity only on the first call that finds the
//! connection open, so registry teardown runs exactly once no matter how many
//! terminal events arrive.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::registry::ClientId;

/// Connection lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// TCP accepted, WebSocket upgrade in progress
    Connecting,
    /// Registered and routing
    Open,
    /// Terminal
    Closed,
}

/// Per-connection state
#[derive(Debug)]
pub struct ConnectionState {
    /// Remote peer address
    pub peer_addr: SocketAddr,

    /// Current phase
    pub phase: ConnectionPhase,

    /// Connection start time
    pub connected_at: Instant,

    /// Identity while open
    client_id: Option<ClientId>,

    /// Frames received from the client
    pub frames_received: u64,

    /// Received frames that were forwarded
    pub frames_forwarded: u64,

    /// Frames delivered to the client
    pub frames_sent: u64,
}

impl ConnectionState {
    /// Create state for a freshly accepted socket
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self {
            peer_addr,
            phase: ConnectionPhase::Connecting,
            connected_at: Instant::now(),
            client_id: None,
            frames_received: 0,
            frames_forwarded: 0,
            frames_sent: 0,
        }
    }

    /// Transition to open with the assigned identity
    ///
    /// Ignored unless the connection is still connecting.
    pub fn open(&mut self, id: ClientId) {
        if self.phase == ConnectionPhase::Connecting {
            self.client_id = Some(id);
            self.phase = ConnectionPhase::Open;
        }
    }

    /// Transition to closed
    ///
    /// Returns the identity to unregister the first time an open connection
    /// closes, and `None` on every other call.
    pub fn close(&mut self) -> Option<ClientId> {
        self.phase = ConnectionPhase::Closed;
        self.client_id.take()
    }

    /// Identity while the connection is open
    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    /// Check if the connection is open
    pub fn is_open(&self) -> bool {
        self.phase == ConnectionPhase::Open
    }

    /// Count an inbound frame
    pub fn on_frame_received(&mut self, forwarded: bool) {
        self.frames_received += 1;
        if forwarded {
            self.frames_forwarded += 1;
        }
    }

    /// Count an outbound frame
    pub fn on_frame_sent(&mut self) {
        self.frames_sent += 1;
    }

    /// Get connection duration
    pub fn duration(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    #[test]
    fn test_connection_lifecycle() {
        let mut state = ConnectionState::new(addr());
        assert_eq!(state.phase, ConnectionPhase::Connecting);
        assert!(state.client_id().is_none());

        state.open(ClientId::new("a"));
        assert!(state.is_open());
        assert_eq!(state.client_id(), Some(&ClientId::new("a")));

        assert_eq!(state.close(), Some(ClientId::new("a")));
        assert_eq!(state.phase, ConnectionPhase::Closed);
        assert!(!state.is_open());
    }

    #[test]
    fn test_close_is_one_shot() {
        let mut state = ConnectionState::new(addr());
        state.open(ClientId::new("a"));

        assert!(state.close().is_some());
        assert!(state.close().is_none());
        assert!(state.close().is_none());
    }

    #[test]
    fn test_close_before_open() {
        let mut state = ConnectionState::new(addr());

        assert!(state.close().is_none());

        // A closed connection cannot be reopened
        state.open(ClientId::new("late"));
        assert_eq!(state.phase, ConnectionPhase::Closed);
        assert!(state.client_id().is_none());
    }

    #[test]
    fn test_frame_counters() {
        let mut state = ConnectionState::new(addr());

        state.on_frame_received(true);
        state.on_frame_received(false);
        state.on_frame_sent();

        assert_eq!(state.frames_received, 2);
        assert_eq!(state.frames_forwarded, 1);
        assert_eq!(state.frames_sent, 1);
    }
}
