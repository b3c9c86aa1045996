//! Connection registry for identity-addressed routing
//!
//! The registry owns the mapping from client identity to the outbound queue
//! of that client's connection. Identities are assigned here, and an entry
//! lives exactly as long as its connection.
//!
//! # Architecture
//!
//! ```text
//!    accept ──► register(handle) ──► ClientId ──► {"type":"client-id"}
//!                      │
//!                      ▼
//!         RwLock<HashMap<ClientId, PeerHandle>>
//!                      ▲
//!    route  ──► lookup(target) ──► handle.send(frame)
//!                      │
//!    close  ──► unregister(id)   (idempotent)
//! ```
//!
//! Writes never happen under the map lock: `lookup` clones the handle, which
//! is a cheap `mpsc::Sender` clone, and the caller enqueues afterwards.

pub mod config;
pub mod entry;
pub mod error;
pub mod id;
pub mod store;

pub use config::RegistryConfig;
pub use entry::PeerHandle;
pub use error::RegistryError;
pub use id::ClientId;
pub use store::ClientRegistry;
