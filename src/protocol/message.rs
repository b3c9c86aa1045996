//! Outbound frames

use serde::Serialize;
use serde_json::value::RawValue;

use super::envelope::SignalKind;
use crate::registry::ClientId;

/// Frames the relay writes to clients
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage<'a> {
    /// Identity announcement, always the first frame on a connection
    #[serde(rename = "client-id")]
    ClientId { id: &'a ClientId },

    #[serde(rename = "offer")]
    Offer {
        #[serde(skip_serializing_if = "Option::is_none")]
        offer: Option<&'a RawValue>,
        sender: &'a ClientId,
    },

    #[serde(rename = "answer")]
    Answer {
        #[serde(skip_serializing_if = "Option::is_none")]
        answer: Option<&'a RawValue>,
        sender: &'a ClientId,
    },

    #[serde(rename = "ice_candidate")]
    IceCandidate {
        #[serde(skip_serializing_if = "Option::is_none")]
        candidate: Option<&'a RawValue>,
        sender: &'a ClientId,
    },
}

impl<'a> ServerMessage<'a> {
    /// Build the forward of a signal on behalf of `sender`
    pub fn forward(kind: SignalKind, payload: Option<&'a RawValue>, sender: &'a ClientId) -> Self {
        match kind {
            SignalKind::Offer => ServerMessage::Offer {
                offer: payload,
                sender,
            },
            SignalKind::Answer => ServerMessage::Answer {
                answer: payload,
                sender,
            },
            SignalKind::IceCandidate => ServerMessage::IceCandidate {
                candidate: payload,
                sender,
            },
        }
    }

    /// Encode as a JSON text frame
    pub fn to_json(&self) -> String {
        // Only strings and pre-validated raw JSON go in, so this cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
