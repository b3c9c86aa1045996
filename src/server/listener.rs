//! Signaling server listener
//!
//! Handles TCP accept loop and spawns connection handlers.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::registry::ClientRegistry;
use crate::router::Router;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::stats::{RelayStats, StatsSnapshot};

/// WebSocket signaling server
pub struct SignalServer {
    config: ServerConfig,
    registry: Arc<ClientRegistry>,
    router: Arc<Router>,
    stats: Arc<RelayStats>,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl SignalServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        let registry = Arc::new(ClientRegistry::with_config(config.registry.clone()));
        let stats = Arc::new(RelayStats::new());
        let router = Arc::new(Router::new(Arc::clone(&registry), Arc::clone(&stats)));

        Self {
            config,
            registry,
            router,
            stats,
            connection_semaphore,
        }
    }

    /// Get a reference to the client registry
    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Get a snapshot of the relay counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// Only returns if binding fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve an already bound listener until `shutdown` resolves
    ///
    /// Connections that are already open keep running after shutdown; only
    /// accepting stops.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "Signaling server listening");

        let stats_handle = self.spawn_stats_task();

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
            }
            _ = self.accept_loop(&listener) => {}
        }

        if let Some(handle) = stats_handle {
            handle.abort();
        }

        Ok(())
    }

    async fn accept_loop(&self, listener: &TcpListener) {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit
        let permit: Option<OwnedSemaphorePermit> = match self.connection_semaphore {
            Some(ref sem) => match Arc::clone(sem).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    self.stats.connection_rejected();
                    tracing::warn!(peer = %peer_addr, "Connection rejected: limit reached");
                    return;
                }
            },
            None => None,
        };

        tracing::debug!(peer = %peer_addr, "New connection");

        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::error!(peer = %peer_addr, error = %e, "Failed to configure socket");
                return;
            }
        }

        let mut connection = Connection::new(
            peer_addr,
            self.config.clone(),
            Arc::clone(&self.router),
            Arc::clone(&self.stats),
        );

        tokio::spawn(async move {
            // Held for the lifetime of the connection
            let _permit = permit;

            if let Err(e) = connection.run(socket).await {
                tracing::debug!(peer = %peer_addr, error = %e, "Connection error");
            }

            tracing::debug!(peer = %peer_addr, "Connection closed");
        });
    }

    fn spawn_stats_task(&self) -> Option<JoinHandle<()>> {
        let interval = self.config.stats_interval;
        if interval.is_zero() {
            return None;
        }

        let stats = Arc::clone(&self.stats);

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let s = stats.snapshot();
                tracing::info!(
                    uptime_secs = s.uptime.as_secs(),
                    active = s.active_connections,
                    accepted = s.connections_accepted,
                    rejected = s.connections_rejected,
                    forwarded = s.forwarded,
                    dropped = s.dropped(),
                    "Relay stats"
                );
            }
        }))
    }
}
