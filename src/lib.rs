//! WebSocket signaling relay for peer-to-peer media negotiation
//!
//! Clients connect over WebSocket and are handed a short identity. They then
//! exchange WebRTC offers, answers and ICE candidates by naming each other's
//! identity as `target`; the relay forwards the payload untouched and stamps
//! the sender identity it assigned.
//!
//! # Architecture
//!
//! ```text
//!                          Arc<ClientRegistry>
//!                     ┌─────────────────────────┐
//!                     │ clients: HashMap<Id,    │
//!                     │   PeerHandle {          │
//!                     │     tx: mpsc::Sender,   │
//!                     │   }                     │
//!                     │ >                       │
//!                     └───────────┬─────────────┘
//!                                 │ lookup()
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!    [Connection a]           [Router]              [Connection b]
//!    ws.next() ──────────► route(a, frame) ──► tx.try_send ──► ws.send()
//! ```
//!
//! # Example
//!
//! ```no_run
//! use signal_relay::{ServerConfig, SignalServer};
//!
//! # async fn run() -> signal_relay::Result<()> {
//! let server = SignalServer::new(ServerConfig::default());
//! server.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await
//! # }
//! ```

pub mod error;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod server;
pub mod session;
pub mod stats;

pub use error::{Error, Result};
pub use protocol::{Envelope, ServerMessage, Signal, SignalKind};
pub use registry::{ClientId, ClientRegistry, PeerHandle, RegistryConfig};
pub use router::{RouteOutcome, Router};
pub use server::{ServerConfig, SignalServer};
pub use stats::{RelayStats, StatsSnapshot};
