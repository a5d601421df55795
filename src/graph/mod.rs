//! Graph module — the public statement and the Prover's secret coloring
//!
//! - Graph: validated, immutable adjacency matrix shared by both roles
//! - GraphSource: where the graph comes from (builtin literal or JSON file)
//! - ColoringSolver: exact backtracking search for a proper k-coloring

mod adjacency;
mod coloring;
mod source;

pub use adjacency::{Graph, GraphError};
pub use coloring::{Color, Coloring, ColoringError, ColoringSolver, SolveStats};
pub use source::{BuiltinGraph, GraphSource, JsonGraphFile};
