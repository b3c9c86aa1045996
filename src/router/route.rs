//! Router implementation

use std::sync::Arc;

use crate::protocol::{DecodeError, Envelope, ServerMessage, Signal, SignalKind};
use crate::registry::{ClientId, ClientRegistry};
use crate::stats::RelayStats;

/// Result of routing one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Frame was queued for the target
    Forwarded { kind: SignalKind, target: ClientId },
    /// Target identity is not registered
    TargetNotFound { target: ClientId },
    /// Routable `type` without a `target`, so nobody can receive it
    MissingTarget { kind: SignalKind },
    /// Target's queue rejected the frame
    DeliveryFailed { target: ClientId },
    /// Well-formed envelope with a `type` that is not routed
    UnknownType { kind: String },
    /// Frame was not a valid envelope
    Malformed,
}

impl RouteOutcome {
    /// Check if the frame reached a target queue
    pub fn is_forwarded(&self) -> bool {
        matches!(self, RouteOutcome::Forwarded { .. })
    }
}

/// Longest slice of client-controlled text copied into a log line
const LOG_PREVIEW: usize = 128;

/// Forwards negotiation messages between registered clients
pub struct Router {
    registry: Arc<ClientRegistry>,
    stats: Arc<RelayStats>,
}

impl Router {
    /// Create a router over a registry
    pub fn new(registry: Arc<ClientRegistry>, stats: Arc<RelayStats>) -> Self {
        Self { registry, stats }
    }

    /// Get the registry this router resolves targets in
    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Route one inbound frame from `sender`
    ///
    /// Never fails: every outcome is returned, counted and traced, and the
    /// caller keeps the connection open regardless.
    pub async fn route(&self, sender: &ClientId, frame: &[u8]) -> RouteOutcome {
        let outcome = match Envelope::decode(frame) {
            Ok(Envelope::Signal(signal)) => self.forward(sender, signal).await,
            Ok(Envelope::Unknown { kind }) => {
                tracing::warn!(
                    client_id = %sender,
                    kind = %preview_str(&kind),
                    len = kind.len(),
                    "Unknown message type, dropping"
                );
                RouteOutcome::UnknownType { kind }
            }
            Err(DecodeError::MissingTarget(kind)) => {
                tracing::debug!(
                    client_id = %sender,
                    kind = %kind,
                    "No target, dropping"
                );
                RouteOutcome::MissingTarget { kind }
            }
            Err(e) => {
                self.report_malformed(sender, frame, &e);
                RouteOutcome::Malformed
            }
        };

        self.stats.record(&outcome);
        outcome
    }

    async fn forward(&self, sender: &ClientId, signal: Signal) -> RouteOutcome {
        let Signal {
            kind,
            target,
            payload,
        } = signal;

        let Some(handle) = self.registry.lookup(&target).await else {
            tracing::debug!(
                client_id = %sender,
                target = %target,
                kind = %kind,
                "Target not connected, dropping"
            );
            return RouteOutcome::TargetNotFound { target };
        };

        let frame = ServerMessage::forward(kind, payload.as_deref(), sender).to_json();

        match handle.send(frame) {
            Ok(()) => {
                tracing::debug!(
                    client_id = %sender,
                    target = %target,
                    kind = %kind,
                    "Forwarded"
                );
                RouteOutcome::Forwarded { kind, target }
            }
            Err(e) => {
                tracing::debug!(
                    client_id = %sender,
                    target = %target,
                    kind = %kind,
                    error = %e,
                    "Delivery failed, dropping"
                );
                RouteOutcome::DeliveryFailed { target }
            }
        }
    }

    fn report_malformed(&self, sender: &ClientId, frame: &[u8], error: &DecodeError) {
        let preview = String::from_utf8_lossy(&frame[..frame.len().min(LOG_PREVIEW)]);

        tracing::warn!(
            client_id = %sender,
            len = frame.len(),
            error = %error,
            preview = %preview,
            "Malformed message, dropping"
        );
    }
}

/// Cut `text` to at most `LOG_PREVIEW` bytes on a char boundary
fn preview_str(text: &str) -> &str {
    if text.len() <= LOG_PREVIEW {
        return text;
    }
    let mut end = LOG_PREVIEW;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
