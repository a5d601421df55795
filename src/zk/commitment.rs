//! Vertex commitments — hiding, binding commitments to a round's witness
//!
//! Each vertex color is committed as
//! `SHA256("zk3c-vertex-v1" || round || vertex || color || blinding)` with a
//! fresh 32-byte blinding per vertex. The Prover publishes every digest
//! before the challenge and opens only the two queried vertices afterwards.

use super::Witness;
use crate::graph::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const VERTEX_DOMAIN: &[u8] = b"zk3c-vertex-v1";
const ROOT_DOMAIN: &[u8] = b"zk3c-root-v1";

/// Public commitments to every vertex color of one round's witness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentSet {
    /// Round the witness belongs to
    pub round: u32,
    /// Hex digest per vertex, indexed by vertex
    pub vertex_commitments: Vec<String>,
    /// Digest over all vertex commitments, for logging and transcript checks
    pub root_commitment: String,
}

/// Reveal of a single committed vertex color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub vertex: usize,
    pub color: Color,
    /// Hex-encoded blinding factor
    pub blinding: String,
}

impl CommitmentSet {
    pub fn len(&self) -> usize {
        self.vertex_commitments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_commitments.is_empty()
    }

    /// Check that `opening` reproduces the committed digest for its vertex
    pub fn verify_opening(&self, opening: &Opening) -> bool {
        let Some(expected) = self.vertex_commitments.get(opening.vertex) else {
            return false;
        };
        let Ok(blinding) = hex::decode(&opening.blinding) else {
            return false;
        };
        commit_vertex(self.round, opening.vertex, opening.color, &blinding) == *expected
    }

    /// Recompute the root from the vertex digests
    pub fn verify_root(&self) -> bool {
        compute_root(self.round, &self.vertex_commitments) == self.root_commitment
    }
}

/// A witness together with the secrets needed to open its commitments
#[derive(Debug)]
pub struct CommittedWitness {
    witness: Witness,
    blindings: Vec<[u8; 32]>,
    commitments: CommitmentSet,
}

impl CommittedWitness {
    /// Commit to every vertex of `witness` with fresh blindings
    pub fn commit<R: Rng + ?Sized>(witness: Witness, round: u32, rng: &mut R) -> Self {
        let blindings: Vec<[u8; 32]> = (0..witness.len()).map(|_| rng.gen()).collect();
        let vertex_commitments: Vec<String> = witness
            .colors()
            .iter()
            .zip(&blindings)
            .enumerate()
            .map(|(vertex, (&color, blinding))| commit_vertex(round, vertex, color, blinding))
            .collect();
        let root_commitment = compute_root(round, &vertex_commitments);
        Self {
            witness,
            blindings,
            commitments: CommitmentSet {
                round,
                vertex_commitments,
                root_commitment,
            },
        }
    }

    pub fn commitments(&self) -> &CommitmentSet {
        &self.commitments
    }

    pub fn witness(&self) -> &Witness {
        &self.witness
    }

    /// Open vertex `v`; `None` if the witness has no entry for it
    pub fn open(&self, v: usize) -> Option<Opening> {
        let color = self.witness.color_of(v)?;
        let blinding = self.blindings.get(v)?;
        Some(Opening {
            vertex: v,
            color,
            blinding: hex::encode(blinding),
        })
    }
}

fn commit_vertex(round: u32, vertex: usize, color: Color, blinding: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(VERTEX_DOMAIN);
    hasher.update(round.to_le_bytes());
    hasher.update((vertex as u64).to_le_bytes());
    hasher.update([color]);
    hasher.update(blinding);
    hex::encode(hasher.finalize())
}

fn compute_root(round: u32, vertex_commitments: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ROOT_DOMAIN);
    hasher.update(round.to_le_bytes());
    for c in vertex_commitments {
        hasher.update(c.as_bytes());
    }
    hex::encode(hasher.finalize())
}
