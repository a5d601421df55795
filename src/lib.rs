//! zk-three-color — interactive zero-knowledge proof of graph 3-colorability
//!
//! A Prover who knows a proper coloring convinces a Verifier, one challenged
//! edge per round, without revealing the coloring.

pub mod config;
pub mod graph;
pub mod protocol;
pub mod zk;

pub use config::{ChallengeSampling, ProtocolConfig};
pub use graph::{BuiltinGraph, Coloring, ColoringSolver, Graph, GraphSource};
pub use protocol::{ProtocolEngine, ProverSession, Transcript, Verdict, VerifierSession};
pub use zk::{Permutation, Witness};
