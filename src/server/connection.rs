//! Per-connection task
//!
//! Upgrades the socket to WebSocket, registers the client, announces its
//! identity, then multiplexes two directions until either side ends:
//! frames from the client go to the router, frames queued for the client by
//! other connections go to the socket.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::WebSocketStream;

use crate::error::{Error, Result};
use crate::protocol::ServerMessage;
use crate::registry::{ClientId, ClientRegistry, PeerHandle};
use crate::router::Router;
use crate::server::config::ServerConfig;
use crate::session::ConnectionState;
use crate::stats::RelayStats;

/// A single client connection
pub(crate) struct Connection {
    state: ConnectionState,
    config: ServerConfig,
    registry: Arc<ClientRegistry>,
    router: Arc<Router>,
    stats: Arc<RelayStats>,
}

impl Connection {
    pub(crate) fn new(
        peer_addr: SocketAddr,
        config: ServerConfig,
        router: Arc<Router>,
        stats: Arc<RelayStats>,
    ) -> Self {
        Self {
            state: ConnectionState::new(peer_addr),
            config,
            registry: Arc::clone(router.registry()),
            router,
            stats,
        }
    }

    /// Drive the connection to completion
    ///
    /// The registry entry is removed before this returns, whichever way the
    /// connection ended.
    pub(crate) async fn run(&mut self, socket: TcpStream) -> Result<()> {
        let ws = self.accept(socket).await?;
        let (mut sink, mut source) = ws.split();

        let (handle, mut outbound) = PeerHandle::channel(
            self.state.peer_addr,
            self.registry.config().outbound_capacity,
        );
        let id = self.registry.register(handle).await;
        self.state.open(id.clone());
        self.stats.connection_opened();

        let result = self.pump(&id, &mut sink, &mut source, &mut outbound).await;

        // Unregister while the queue receiver is still alive
        self.teardown().await;
        let _ = sink.close().await;

        result
    }

    async fn accept(&self, socket: TcpStream) -> Result<WebSocketStream<TcpStream>> {
        let mut ws_config = WebSocketConfig::default();
        ws_config.max_message_size = Some(self.config.max_message_size);

        let handshake = tokio_tungstenite::accept_async_with_config(socket, Some(ws_config));

        match tokio::time::timeout(self.config.handshake_timeout, handshake).await {
            Ok(ws) => Ok(ws?),
            Err(_) => Err(Error::HandshakeTimeout(self.config.handshake_timeout)),
        }
    }

    async fn pump<Si, St>(
        &mut self,
        id: &ClientId,
        sink: &mut Si,
        source: &mut St,
        outbound: &mut mpsc::Receiver<String>,
    ) -> Result<()>
    where
        Si: Sink<Message, Error = tungstenite::Error> + Unpin,
        St: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
    {
        // Identity goes out before anything another client may have queued
        let hello = ServerMessage::ClientId { id }.to_json();
        sink.send(Message::text(hello)).await?;
        self.state.on_frame_sent();

        loop {
            tokio::select! {
                frame = outbound.recv() => match frame {
                    Some(frame) => {
                        sink.send(Message::text(frame)).await?;
                        self.state.on_frame_sent();
                    }
                    None => return Ok(()),
                },
                msg = source.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        self.on_frame(id, text.as_str().as_bytes()).await
                    }
                    Some(Ok(Message::Binary(data))) => self.on_frame(id, &data).await,
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!(client_id = %id, frame = ?frame, "Close received");
                        return Ok(());
                    }
                    // Ping/pong are answered by tungstenite
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                },
            }
        }
    }

    async fn on_frame(&mut self, id: &ClientId, frame: &[u8]) {
        let outcome = self.router.route(id, frame).await;
        self.state.on_frame_received(outcome.is_forwarded());
    }

    async fn teardown(&mut self) {
        let Some(id) = self.state.close() else {
            return;
        };

        self.registry.unregister(&id).await;
        self.stats.connection_closed();

        tracing::info!(
            client_id = %id,
            peer = %self.state.peer_addr,
            duration_secs = self.state.duration().as_secs(),
            received = self.state.frames_received,
            forwarded = self.state.frames_forwarded,
            sent = self.state.frames_sent,
            "Client disconnected"
        );
    }
}
