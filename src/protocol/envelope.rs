//! Inbound envelope decoding
//!
//! Frames are decoded once into [`Envelope`]; nothing downstream probes
//! JSON fields.

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::registry::ClientId;

/// Negotiation message kinds the relay forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Session description offer
    Offer,
    /// Session description answer
    Answer,
    /// ICE connectivity candidate
    IceCandidate,
}

impl SignalKind {
    /// Parse a wire `type` value
    pub fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "offer" => Some(SignalKind::Offer),
            "answer" => Some(SignalKind::Answer),
            "ice_candidate" => Some(SignalKind::IceCandidate),
            _ => None,
        }
    }

    /// Wire `type` value
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice_candidate",
        }
    }

    /// Name of the field holding this kind's payload
    pub fn payload_field(&self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "candidate",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A routable negotiation message
#[derive(Debug)]
pub struct Signal {
    /// Message kind
    pub kind: SignalKind,
    /// Identity the message is addressed to
    pub target: ClientId,
    /// Raw payload JSON, `None` if the field was absent
    pub payload: Option<Box<RawValue>>,
}

/// A decoded inbound frame
#[derive(Debug)]
pub enum Envelope {
    /// Offer, answer or ICE candidate
    Signal(Signal),
    /// Well-formed frame with a `type` the relay does not forward
    Unknown {
        /// The unrecognized `type` value
        kind: String,
    },
}

/// Why a frame could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not a JSON object, or `type` missing or not a string
    Malformed(String),
    /// A routable `type` with no `target`, or a `null` one
    MissingTarget(SignalKind),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Malformed(reason) => write!(f, "Malformed envelope: {}", reason),
            DecodeError::MissingTarget(kind) => write!(f, "{} envelope without target", kind),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Deserialize)]
struct WireEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    target: Option<String>,
    #[serde(default, deserialize_with = "raw_present")]
    offer: Option<Box<RawValue>>,
    #[serde(default, deserialize_with = "raw_present")]
    answer: Option<Box<RawValue>>,
    #[serde(default, deserialize_with = "raw_present")]
    candidate: Option<Box<RawValue>>,
}

// Keeps an explicit `null` payload as raw `null` instead of folding it into `None`
fn raw_present<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

impl Envelope {
    /// Decode a text or binary frame
    pub fn decode(frame: &[u8]) -> Result<Self, DecodeError> {
        let wire: WireEnvelope =
            serde_json::from_slice(frame).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        let Some(kind) = SignalKind::from_type(&wire.kind) else {
            return Ok(Envelope::Unknown { kind: wire.kind });
        };

        let target = wire
            .target
            .map(ClientId::from)
            .ok_or(DecodeError::MissingTarget(kind))?;

        let payload = match kind {
            SignalKind::Offer => wire.offer,
            SignalKind::Answer => wire.answer,
            SignalKind::IceCandidate => wire.candidate,
        };

        Ok(Envelope::Signal(Signal {
            kind,
            target,
            payload,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(frame: &str) -> Signal {
        match Envelope::decode(frame.as_bytes()).unwrap() {
            Envelope::Signal(signal) => signal,
            other => panic!("expected signal, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_offer() {
        let s = signal(r#"{"type":"offer","target":"b","sender":"a","offer":{"sdp":"v=0"}}"#);

        assert_eq!(s.kind, SignalKind::Offer);
        assert_eq!(s.target, ClientId::new("b"));
        assert_eq!(s.payload.unwrap().get(), r#"{"sdp":"v=0"}"#);
    }

    #[test]
    fn test_decode_picks_matching_payload_field() {
        let s = signal(r#"{"type":"ice_candidate","target":"b","offer":"wrong","candidate":"c"}"#);

        assert_eq!(s.kind, SignalKind::IceCandidate);
        assert_eq!(s.payload.unwrap().get(), r#""c""#);
    }

    #[test]
    fn test_decode_payload_verbatim() {
        // Whitespace and key order inside the payload survive untouched
        let s = signal("{\"type\":\"answer\",\"target\":\"b\",\"answer\": { \"z\" : 1,\"a\":[ 2 ] }}");

        assert_eq!(s.payload.unwrap().get(), "{ \"z\" : 1,\"a\":[ 2 ] }");
    }

    #[test]
    fn test_decode_null_and_absent_payload() {
        let s = signal(r#"{"type":"offer","target":"b","offer":null}"#);
        assert_eq!(s.payload.unwrap().get(), "null");

        let s = signal(r#"{"type":"offer","target":"b"}"#);
        assert!(s.payload.is_none());
    }

    #[test]
    fn test_decode_unknown_type() {
        let envelope = Envelope::decode(br#"{"type":"bye","target":"b"}"#).unwrap();

        assert!(matches!(envelope, Envelope::Unknown { kind } if kind == "bye"));
    }

    #[test]
    fn test_decode_hyphenated_candidate_is_unknown() {
        let envelope = Envelope::decode(br#"{"type":"ice-candidate","target":"b"}"#).unwrap();

        assert!(matches!(envelope, Envelope::Unknown { .. }));
    }

    #[test]
    fn test_decode_malformed() {
        for frame in [
            "not json",
            "[1,2,3]",
            "\"offer\"",
            r#"{"target":"b","offer":"x"}"#,
            r#"{"type":7,"target":"b"}"#,
            r#"{"type":"offer","target":5}"#,
            "",
        ] {
            assert!(
                matches!(
                    Envelope::decode(frame.as_bytes()),
                    Err(DecodeError::Malformed(_))
                ),
                "frame {:?} should be malformed",
                frame
            );
        }
    }

    #[test]
    fn test_decode_missing_target() {
        assert_eq!(
            Envelope::decode(br#"{"type":"answer","answer":"x"}"#).unwrap_err(),
            DecodeError::MissingTarget(SignalKind::Answer)
        );
    }

    #[test]
    fn test_kind_names() {
        for kind in [SignalKind::Offer, SignalKind::Answer, SignalKind::IceCandidate] {
            assert_eq!(SignalKind::from_type(kind.as_str()), Some(kind));
        }
        assert_eq!(SignalKind::IceCandidate.payload_field(), "candidate");
    }
}
