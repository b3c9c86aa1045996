//! Client registry implementation
//!
//! The central registry that maps live client identities to their outbound
//! queues.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::config::{RegistryConfig, MAX_ID_LENGTH};
use super::entry::PeerHandle;
use super::id::ClientId;

/// Collisions tolerated at one identity length before generating longer ids
const ATTEMPTS_PER_LENGTH: usize = 16;

/// Central registry for all live clients
///
/// Thread-safe via `RwLock`. Routing only needs `lookup`, so concurrent
/// senders resolve targets under the shared read lock.
pub struct ClientRegistry {
    /// Map of client identity to outbound handle
    clients: RwLock<HashMap<ClientId, PeerHandle>>,

    /// Configuration
    config: RegistryConfig,
}

impl ClientRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    ///
    /// Out-of-range values are clamped as by the `RegistryConfig` builders.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            config: config.normalized(),
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a connection and assign it a fresh identity
    ///
    /// Generation and insertion happen under the write lock, so concurrent
    /// registrations can never produce the same identity. Repeated
    /// collisions lengthen the generated id, so a crowded id space cannot
    /// stall registration.
    pub async fn register(&self, handle: PeerHandle) -> ClientId {
        let mut clients = self.clients.write().await;

        let mut attempt = 0;
        let id = loop {
            let len = id_length_for_attempt(self.config.id_length, attempt);
            let candidate = ClientId::random(len);
            if !clients.contains_key(&candidate) {
                break candidate;
            }
            tracing::trace!(client_id = %candidate, attempt, "Identity collision, regenerating");
            attempt += 1;
        };

        tracing::info!(
            client_id = %id,
            peer = %handle.peer_addr(),
            clients = clients.len() + 1,
            "Client registered"
        );

        clients.insert(id.clone(), handle);
        id
    }

    /// Resolve an identity to its outbound handle
    pub async fn lookup(&self, id: &ClientId) -> Option<PeerHandle> {
        self.clients.read().await.get(id).cloned()
    }

    /// Remove a client
    ///
    /// Returns `true` if the identity was registered. Removing an absent
    /// identity is a no-op.
    pub async fn unregister(&self, id: &ClientId) -> bool {
        let mut clients = self.clients.write().await;

        match clients.remove(id) {
            Some(handle) => {
                tracing::info!(
                    client_id = %id,
                    peer = %handle.peer_addr(),
                    connected_secs = handle.age().as_secs(),
                    clients = clients.len(),
                    "Client unregistered"
                );
                true
            }
            None => {
                tracing::trace!(client_id = %id, "Unregister for unknown client ignored");
                false
            }
        }
    }

    /// Check if an identity is currently registered
    pub async fn contains(&self, id: &ClientId) -> bool {
        self.clients.read().await.contains_key(id)
    }

    /// Get the identities of all live clients
    pub async fn client_ids(&self) -> Vec<ClientId> {
        self.clients.read().await.keys().cloned().collect()
    }

    /// Get the number of live clients
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Check if no clients are registered
    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }
}

fn id_length_for_attempt(base: usize, attempt: usize) -> usize {
    (base + attempt / ATTEMPTS_PER_LENGTH).min(MAX_ID_LENGTH)
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
