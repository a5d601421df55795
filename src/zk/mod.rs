//! Zero-knowledge building blocks for the 3-coloring proof
//!
//! - Permutation: fresh color relabeling per round (hiding across rounds)
//! - Witness: the Prover's permuted coloring
//! - CommittedWitness / CommitmentSet: per-vertex hash commitments, opened
//!   only for the challenged edge

mod commitment;
mod permutation;
mod witness;

pub use commitment::{CommitmentSet, CommittedWitness, Opening};
pub use permutation::{Permutation, PermutationError};
pub use witness::Witness;
