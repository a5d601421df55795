//! Interactive proof protocol
//!
//! - Message / Payload: wire envelope for commitments, challenges, responses
//! - ProverSession / VerifierSession: per-round state machines
//! - ProtocolEngine: both roles as concurrent tasks over mpsc channels
//! - Transcript: the Verifier's record and the overall outcome

mod engine;
mod error;
mod message;
mod prover;
mod transcript;
mod verifier;

pub use engine::ProtocolEngine;
pub use error::ProtocolError;
pub use message::{Challenge, Message, Payload, Response, ResponseError, Role, PROTOCOL_VERSION};
pub use prover::{ProverSession, ProverState};
pub use transcript::{OverallVerdict, ProofOutcome, RoundRecord, Transcript};
pub use verifier::{Verdict, VerifierSession, VerifierState};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Per-role RNG: OS entropy, or a role-specific stream derived from `seed`
pub(crate) fn seeded_rng(seed: Option<u64>, role: Role) -> StdRng {
    match seed {
        Some(seed) => {
            let salt = match role {
                Role::Prover => 0x5052_4f56,
                Role::Verifier => 0x5645_5249,
            };
            StdRng::seed_from_u64(seed ^ salt)
        }
        None => StdRng::from_entropy(),
    }
}
