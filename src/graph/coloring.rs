//! Coloring — exact k-coloring search by depth-first backtracking
//!
//! Vertices are visited in index order; at each vertex colors 1..=k are
//! tried in increasing order and a color is legal iff no already-colored
//! neighbor holds it. For a fixed graph and k the result is deterministic.

use super::Graph;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// A color label in `1..=k`
pub type Color = u8;

/// Marker for a vertex the search has not assigned yet
const UNASSIGNED: Color = 0;

/// A complete assignment vertex → color (0-based vertices)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    colors: Vec<Color>,
    k: u8,
}

impl Coloring {
    /// Wrap an explicit assignment; no properness check is made
    pub fn from_colors(colors: Vec<Color>, k: u8) -> Self {
        Self { colors, k }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of colors the assignment draws from
    pub fn k(&self) -> u8 {
        self.k
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color_of(&self, v: usize) -> Option<Color> {
        self.colors.get(v).copied()
    }

    /// Edges whose endpoints share a color, or that touch an uncolored vertex
    pub fn conflicts(&self, graph: &Graph) -> Vec<(usize, usize)> {
        graph
            .edges()
            .into_iter()
            .filter(|&(u, v)| match (self.color_of(u), self.color_of(v)) {
                (Some(cu), Some(cv)) => cu == cv,
                _ => true,
            })
            .collect()
    }

    /// Proper iff every vertex has a color in `1..=k` and no edge clashes
    pub fn is_proper(&self, graph: &Graph) -> bool {
        self.colors.len() == graph.vertex_count()
            && self.colors.iter().all(|&c| (1..=self.k).contains(&c))
            && self.conflicts(graph).is_empty()
    }

    /// `{1: c, 2: c, ...}` with 1-based vertex labels
    pub fn display_one_based(&self) -> String {
        let entries: Vec<String> = self
            .colors
            .iter()
            .enumerate()
            .map(|(v, c)| format!("{}: {}", v + 1, c))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}

/// Search statistics reported by the solver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Color assignments attempted
    pub assignments: u64,
    /// Assignments undone after a dead end
    pub backtracks: u64,
}

/// Backtracking k-coloring search
#[derive(Debug, Clone)]
pub struct ColoringSolver {
    k: u8,
}

impl ColoringSolver {
    pub fn new(k: u8) -> Self {
        Self { k }
    }

    pub fn k(&self) -> u8 {
        self.k
    }

    /// Find a proper k-coloring or report infeasibility
    pub fn solve(&self, graph: &Graph) -> Result<Coloring, ColoringError> {
        self.solve_with_stats(graph).map(|(coloring, _)| coloring)
    }

    pub fn solve_with_stats(&self, graph: &Graph) -> Result<(Coloring, SolveStats), ColoringError> {
        let n = graph.vertex_count();
        if self.k == 0 && n > 0 {
            return Err(ColoringError::ZeroColors);
        }

        let mut colors = vec![UNASSIGNED; n];
        let mut stats = SolveStats::default();
        if self.assign(graph, &mut colors, &mut stats) {
            debug!(
                "Solved {}-coloring of {} vertices: {} assignments, {} backtracks",
                self.k, n, stats.assignments, stats.backtracks
            );
            Ok((Coloring::from_colors(colors, self.k), stats))
        } else {
            info!(
                "No proper {}-coloring exists ({} assignments, {} backtracks)",
                self.k, stats.assignments, stats.backtracks
            );
            Err(ColoringError::Infeasible { colors: self.k })
        }
    }

    /// Smallest k ≤ `max_colors` for which the graph is k-colorable
    pub fn minimal(graph: &Graph, max_colors: u8) -> Result<Coloring, ColoringError> {
        if graph.vertex_count() == 0 {
            return Ok(Coloring::from_colors(Vec::new(), 0));
        }
        for k in 1..=max_colors {
            match Self::new(k).solve(graph) {
                Ok(coloring) => return Ok(coloring),
                Err(ColoringError::Infeasible { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ColoringError::Infeasible { colors: max_colors })
    }

    fn is_legal(graph: &Graph, colors: &[Color], vertex: usize, color: Color) -> bool {
        graph.neighbors(vertex).all(|w| colors[w] != color)
    }

    /// Depth-first search over vertices in index order, driven by an explicit
    /// cursor so deep graphs do not grow the call stack
    fn assign(&self, graph: &Graph, colors: &mut [Color], stats: &mut SolveStats) -> bool {
        let mut vertex = 0;
        while vertex < colors.len() {
            let previous = colors[vertex];
            if previous != UNASSIGNED {
                // Returned here after everything below failed
                colors[vertex] = UNASSIGNED;
                stats.backtracks += 1;
            }
            let next = (1..=self.k)
                .filter(|&c| c > previous)
                .find(|&c| Self::is_legal(graph, colors, vertex, c));
            match next {
                Some(color) => {
                    colors[vertex] = color;
                    stats.assignments += 1;
                    vertex += 1;
                }
                None if vertex == 0 => return false,
                None => vertex -= 1,
            }
        }
        true
    }
}

/// Witness-search errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColoringError {
    #[error("graph has no proper coloring with {colors} colors")]
    Infeasible { colors: u8 },

    #[error("cannot color a non-empty graph with zero colors")]
    ZeroColors,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BuiltinGraph, GraphSource};

    #[test]
    fn test_builtin_graph_is_three_colorable() {
        let graph = BuiltinGraph.load_graph().unwrap();
        let coloring = ColoringSolver::new(3).solve(&graph).unwrap();
        assert!(coloring.is_proper(&graph));
        for (u, v) in graph.edges() {
            assert_ne!(coloring.color_of(u), coloring.color_of(v));
        }
        // Index-order search with increasing colors is deterministic
        assert_eq!(coloring.colors(), &[1, 2, 1, 2, 3, 3, 3, 3, 1, 2]);
    }

    #[test]
    fn test_k4_is_infeasible() {
        let result = ColoringSolver::new(3).solve(&Graph::complete(4));
        assert_eq!(result, Err(ColoringError::Infeasible { colors: 3 }));
    }

    #[test]
    fn test_four_clique_inside_larger_graph() {
        let graph = Graph::from_edges(
            6,
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (3, 4), (4, 5)],
        )
        .unwrap();
        assert!(ColoringSolver::new(3).solve(&graph).is_err());
        assert!(ColoringSolver::new(4).solve(&graph).unwrap().is_proper(&graph));
    }

    #[test]
    fn test_backtracking_needed() {
        // 0 and 1 are not adjacent but the triangle 2-3-4 forces them apart,
        // so giving both color 1 is a dead end the search has to undo
        let graph = Graph::from_edges(
            5,
            &[(0, 2), (1, 2), (0, 3), (1, 4), (2, 3), (2, 4), (3, 4)],
        )
        .unwrap();
        let (coloring, stats) = ColoringSolver::new(3).solve_with_stats(&graph).unwrap();
        assert!(coloring.is_proper(&graph));
        assert_eq!(coloring.colors(), &[1, 2, 3, 2, 1]);
        assert!(stats.backtracks > 0);
    }

    #[test]
    fn test_long_path_on_small_stack() {
        let n = 3000;
        let edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
        let graph = Graph::from_edges(n, &edges).unwrap();
        let handle = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(move || ColoringSolver::new(3).solve(&graph).map(|c| (c, graph)))
            .unwrap();
        let (coloring, graph) = handle.join().unwrap().unwrap();
        assert!(coloring.is_proper(&graph));
        assert_eq!(&coloring.colors()[..4], &[1, 2, 1, 2]);
    }

    #[test]
    fn test_empty_and_edgeless_graphs() {
        let empty = Graph::from_matrix(Vec::new()).unwrap();
        assert!(ColoringSolver::new(3).solve(&empty).unwrap().is_empty());

        let edgeless = Graph::from_edges(4, &[]).unwrap();
        let coloring = ColoringSolver::new(3).solve(&edgeless).unwrap();
        assert_eq!(coloring.colors(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_zero_colors() {
        assert_eq!(
            ColoringSolver::new(0).solve(&Graph::complete(1)),
            Err(ColoringError::ZeroColors)
        );
    }

    #[test]
    fn test_minimal_colors() {
        let builtin = BuiltinGraph.load_graph().unwrap();
        assert_eq!(ColoringSolver::minimal(&builtin, 8).unwrap().k(), 3);
        assert_eq!(ColoringSolver::minimal(&Graph::complete(5), 8).unwrap().k(), 5);
        assert_eq!(
            ColoringSolver::minimal(&Graph::complete(5), 4),
            Err(ColoringError::Infeasible { colors: 4 })
        );
        let path = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(ColoringSolver::minimal(&path, 8).unwrap().k(), 2);
    }

    #[test]
    fn test_conflicts_reported() {
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let bad = Coloring::from_colors(vec![1, 1, 2], 3);
        assert_eq!(bad.conflicts(&graph), vec![(0, 1)]);
        assert!(!bad.is_proper(&graph));

        let short = Coloring::from_colors(vec![1, 2], 3);
        assert_eq!(short.conflicts(&graph), vec![(1, 2)]);
        assert!(!short.is_proper(&graph));
    }

    #[test]
    fn test_display_one_based() {
        let coloring = Coloring::from_colors(vec![2, 3, 1], 3);
        assert_eq!(coloring.display_one_based(), "{1: 2, 2: 3, 3: 1}");
    }
}
