//! Wire messages exchanged between Prover and Verifier
//!
//! Every message is an envelope {sender, recipient, payload} plus a
//! human-readable note. Protocol-level failures travel inside a `Response`
//! so the Verifier always receives a terminating message.

use crate::graph::Color;
use crate::zk::{CommitmentSet, Opening};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format version
pub const PROTOCOL_VERSION: u32 = 1;

/// The two parties of the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Prover,
    Verifier,
}

impl Role {
    pub fn counterpart(self) -> Role {
        match self {
            Role::Prover => Role::Verifier,
            Role::Verifier => Role::Prover,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Prover => f.write_str("Prover"),
            Role::Verifier => f.write_str("Verifier"),
        }
    }
}

/// The vertex pair the Verifier asks to inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub round: u32,
    pub u: usize,
    pub v: usize,
}

impl Challenge {
    pub fn new(round: u32, u: usize, v: usize) -> Self {
        Self { round, u, v }
    }

    pub fn pair(&self) -> (usize, usize) {
        (self.u, self.v)
    }

    pub fn describe(&self) -> String {
        format!("Show me the endpoints of the edge ({}, {})", self.u + 1, self.v + 1)
    }
}

/// Failures the Prover reports to the Verifier instead of crashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ResponseError {
    #[error("challenge ({u}, {v}) references a vertex outside 0..{n}")]
    MalformedChallenge { u: usize, v: usize, n: usize },

    #[error("witness has no color for vertex {vertex}")]
    InternalInconsistency { vertex: usize },
}

/// The Prover's answer to a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// (u, v) is an edge; here are both witness colors, opened against the
    /// round's commitments when commitments are in use
    Revealed {
        round: u32,
        u: usize,
        v: usize,
        colors: [Color; 2],
        openings: Option<[Opening; 2]>,
    },
    /// (u, v) is not an edge; nothing is disclosed
    NotAnEdge { round: u32, u: usize, v: usize },
    /// The Prover could not answer
    Failed {
        round: u32,
        u: usize,
        v: usize,
        error: ResponseError,
    },
}

impl Response {
    pub fn round(&self) -> u32 {
        match self {
            Response::Revealed { round, .. }
            | Response::NotAnEdge { round, .. }
            | Response::Failed { round, .. } => *round,
        }
    }

    pub fn pair(&self) -> (usize, usize) {
        match self {
            Response::Revealed { u, v, .. }
            | Response::NotAnEdge { u, v, .. }
            | Response::Failed { u, v, .. } => (*u, *v),
        }
    }

    /// True only when the Prover confirmed the edge and revealed colors
    pub fn is_verified(&self) -> bool {
        matches!(self, Response::Revealed { .. })
    }

    /// Revealed colors; absent unless the edge was confirmed
    pub fn colors(&self) -> Option<(Color, Color)> {
        match self {
            Response::Revealed { colors, .. } => Some((colors[0], colors[1])),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ResponseError> {
        match self {
            Response::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Response::Revealed { u, v, colors, .. } => format!(
                "Yep, ({}, {}) ∈ E. Coloring of your selected vertices: (V: {} --> C: {}), (V: {} --> C: {})",
                u + 1,
                v + 1,
                u + 1,
                colors[0],
                v + 1,
                colors[1]
            ),
            Response::NotAnEdge { u, v, .. } => {
                format!("Sorry, ({}, {}) ∉ E. No coloring for you!", u + 1, v + 1)
            }
            Response::Failed { error, .. } => format!("Cannot answer: {}", error),
        }
    }
}

/// Message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Prover → Verifier, opens each committed round
    Commitment(CommitmentSet),
    /// Verifier → Prover
    Challenge(Challenge),
    /// Prover → Verifier
    Response(Response),
}

impl Payload {
    pub fn round(&self) -> u32 {
        match self {
            Payload::Commitment(set) => set.round,
            Payload::Challenge(challenge) => challenge.round,
            Payload::Response(response) => response.round(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Commitment(_) => "commitment",
            Payload::Challenge(_) => "challenge",
            Payload::Response(_) => "response",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Payload::Commitment(set) => format!(
                "Committed to {} vertex colors (root {})",
                set.len(),
                &set.root_commitment[..16.min(set.root_commitment.len())]
            ),
            Payload::Challenge(challenge) => challenge.describe(),
            Payload::Response(response) => response.describe(),
        }
    }
}

/// A complete protocol message with envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,
    pub sender: Role,
    pub recipient: Role,
    pub payload: Payload,
    /// Human-readable annotation
    pub note: String,
    pub timestamp: DateTime<Utc>,
    pub version: u32,
}

impl Message {
    /// Create a message addressed to the sender's counterpart
    pub fn new(sender: Role, payload: Payload) -> Self {
        let note = payload.describe();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            recipient: sender.counterpart(),
            payload,
            note,
            timestamp: Utc::now(),
            version: PROTOCOL_VERSION,
        }
    }

    /// `Verifier to Prover: ...` console line
    pub fn render(&self) -> String {
        format!("{} to {}: {}", self.sender, self.recipient, self.note)
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_addresses_counterpart() {
        let msg = Message::new(Role::Verifier, Payload::Challenge(Challenge::new(0, 2, 6)));
        assert_eq!(msg.recipient, Role::Prover);
        assert_eq!(msg.version, PROTOCOL_VERSION);
        assert_eq!(msg.note, "Show me the endpoints of the edge (3, 7)");
        assert_eq!(msg.render(), "Verifier to Prover: Show me the endpoints of the edge (3, 7)");
    }

    #[test]
    fn test_response_accessors() {
        let revealed = Response::Revealed { round: 1, u: 0, v: 1, colors: [2, 3], openings: None };
        assert!(revealed.is_verified());
        assert_eq!(revealed.colors(), Some((2, 3)));
        assert_eq!(revealed.pair(), (0, 1));
        assert_eq!(revealed.round(), 1);

        let declined = Response::NotAnEdge { round: 0, u: 0, v: 2 };
        assert!(!declined.is_verified());
        assert_eq!(declined.colors(), None);
        assert!(declined.error().is_none());

        let failed = Response::Failed {
            round: 0,
            u: 12,
            v: 0,
            error: ResponseError::MalformedChallenge { u: 12, v: 0, n: 10 },
        };
        assert!(!failed.is_verified());
        assert!(failed.error().is_some());
        assert!(failed.describe().contains("outside 0..10"));
    }

    #[test]
    fn test_message_wire_format() {
        let msg = Message::new(
            Role::Prover,
            Payload::Response(Response::NotAnEdge { round: 3, u: 4, v: 6 }),
        );
        let decoded = Message::from_bytes(&msg.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.id, msg.id);
        assert_eq!(decoded.sender, Role::Prover);
        assert_eq!(decoded.payload, msg.payload);
        assert_eq!(decoded.payload.round(), 3);
        assert_eq!(decoded.note, "Sorry, (5, 7) ∉ E. No coloring for you!");
    }
}
