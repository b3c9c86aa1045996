//! Signaling wire protocol
//!
//! All frames are JSON objects tagged by a `type` field.
//!
//! ## Server → client
//!
//! ```json
//! {"type": "client-id", "id": "k3v9x2qa"}
//! {"type": "offer", "offer": <opaque>, "sender": "k3v9x2qa"}
//! {"type": "answer", "answer": <opaque>, "sender": "k3v9x2qa"}
//! {"type": "ice_candidate", "candidate": <opaque>, "sender": "k3v9x2qa"}
//! ```
//!
//! ## Client → server
//!
//! ```json
//! {"type": "offer", "target": "p0m1c7zz", "sender": "k3v9x2qa", "offer": <opaque>}
//! ```
//!
//! The client-supplied `sender` is ignored; forwards carry the identity the
//! relay assigned to the sending connection. Payloads are never parsed beyond
//! finding where they start and end, and are re-emitted byte-for-byte.

pub mod envelope;
pub mod message;

pub use envelope::{DecodeError, Envelope, Signal, SignalKind};
pub use message::ServerMessage;
