//! WebSocket server for the signaling relay
//!
//! The listener accepts TCP connections, upgrades them to WebSocket and runs
//! one task per client. Each task registers its client, forwards inbound
//! frames through the router and writes frames queued by other clients.

pub mod config;
mod connection;
pub mod listener;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use listener::SignalServer;
