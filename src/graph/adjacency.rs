//! Graph — square boolean adjacency matrix over n vertices
//!
//! The matrix is checked once at construction (square, 0/1 entries, zero
//! diagonal, symmetric) and never mutated afterwards, so both protocol
//! roles can hold it behind an `Arc` without locking.

use serde::{Deserialize, Serialize};

/// An undirected simple graph stored as a dense adjacency matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Graph {
    n: usize,
    adj: Vec<Vec<bool>>,
}

impl Graph {
    /// Build a graph from a 0/1 adjacency matrix
    pub fn from_matrix(matrix: Vec<Vec<u8>>) -> Result<Self, GraphError> {
        let n = matrix.len();
        for (row_idx, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::NotSquare {
                    row: row_idx,
                    len: row.len(),
                    expected: n,
                });
            }
        }

        let mut adj = vec![vec![false; n]; n];
        for u in 0..n {
            for v in 0..n {
                adj[u][v] = match matrix[u][v] {
                    0 => false,
                    1 => true,
                    other => return Err(GraphError::InvalidEntry { u, v, value: other }),
                };
            }
            if adj[u][u] {
                return Err(GraphError::SelfLoop(u));
            }
        }
        for u in 0..n {
            for v in (u + 1)..n {
                if adj[u][v] != adj[v][u] {
                    return Err(GraphError::Asymmetric { u, v });
                }
            }
        }

        Ok(Self { n, adj })
    }

    /// Build a graph on `n` vertices from an undirected edge list
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut matrix = vec![vec![0u8; n]; n];
        for &(u, v) in edges {
            if u >= n || v >= n {
                return Err(GraphError::VertexOutOfRange { vertex: u.max(v), n });
            }
            matrix[u][v] = 1;
            matrix[v][u] = 1;
        }
        Self::from_matrix(matrix)
    }

    /// The complete graph K_n
    pub fn complete(n: usize) -> Self {
        let adj = (0..n)
            .map(|u| (0..n).map(|v| u != v).collect())
            .collect();
        Self { n, adj }
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    pub fn contains_vertex(&self, v: usize) -> bool {
        v < self.n
    }

    /// Adjacency lookup; out-of-range pairs are never edges
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        u < self.n && v < self.n && self.adj[u][v]
    }

    /// Neighbors of `v` in increasing order
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj
            .get(v)
            .into_iter()
            .flat_map(|row| row.iter().enumerate().filter(|(_, e)| **e).map(|(i, _)| i))
    }

    /// All edges as (u, v) with u < v
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for u in 0..self.n {
            for v in (u + 1)..self.n {
                if self.adj[u][v] {
                    edges.push((u, v));
                }
            }
        }
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Row-per-line rendering of the matrix, e.g. `[0 1 1]`
    pub fn render(&self) -> String {
        self.adj
            .iter()
            .map(|row| {
                let cells: Vec<&str> = row.iter().map(|&e| if e { "1" } else { "0" }).collect();
                format!("[{}]", cells.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn summary(&self) -> String {
        format!("Graph | vertices={} | edges={}", self.n, self.edge_count())
    }
}

impl TryFrom<Vec<Vec<u8>>> for Graph {
    type Error = GraphError;

    fn try_from(matrix: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_matrix(matrix)
    }
}

impl From<Graph> for Vec<Vec<u8>> {
    fn from(graph: Graph) -> Self {
        graph
            .adj
            .into_iter()
            .map(|row| row.into_iter().map(u8::from).collect())
            .collect()
    }
}

/// Graph construction and loading errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("adjacency matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("adjacency entry ({u}, {v}) is {value}, expected 0 or 1")]
    InvalidEntry { u: usize, v: usize, value: u8 },

    #[error("self-loop at vertex {0}")]
    SelfLoop(usize),

    #[error("adjacency matrix is not symmetric at ({u}, {v})")]
    Asymmetric { u: usize, v: usize },

    #[error("vertex {vertex} out of range for {n} vertices")]
    VertexOutOfRange { vertex: usize, n: usize },

    #[error("failed to read graph: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse graph: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::from_matrix(vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]]).unwrap()
    }

    #[test]
    fn test_from_matrix_valid() {
        let g = triangle();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert!(g.has_edge(0, 2));
        assert!(g.has_edge(2, 0));
        assert!(!g.has_edge(1, 1));
    }

    #[test]
    fn test_rejects_malformed_matrices() {
        assert!(matches!(
            Graph::from_matrix(vec![vec![0, 1], vec![1]]),
            Err(GraphError::NotSquare { row: 1, .. })
        ));
        assert!(matches!(
            Graph::from_matrix(vec![vec![0, 2], vec![2, 0]]),
            Err(GraphError::InvalidEntry { value: 2, .. })
        ));
        assert!(matches!(
            Graph::from_matrix(vec![vec![1, 0], vec![0, 0]]),
            Err(GraphError::SelfLoop(0))
        ));
        assert!(matches!(
            Graph::from_matrix(vec![vec![0, 1], vec![0, 0]]),
            Err(GraphError::Asymmetric { u: 0, v: 1 })
        ));
    }

    #[test]
    fn test_out_of_range_is_not_an_edge() {
        let g = triangle();
        assert!(!g.has_edge(0, 3));
        assert!(!g.has_edge(7, 1));
        assert!(!g.contains_vertex(3));
        assert_eq!(g.neighbors(9).count(), 0);
    }

    #[test]
    fn test_from_edges_and_neighbors() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        assert_eq!(g.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(g.edges(), vec![(0, 1), (1, 2), (2, 3)]);
        assert!(Graph::from_edges(2, &[(0, 5)]).is_err());
        assert!(matches!(
            Graph::from_edges(3, &[(1, 1)]),
            Err(GraphError::SelfLoop(1))
        ));
    }

    #[test]
    fn test_complete_graph() {
        let k4 = Graph::complete(4);
        assert_eq!(k4.edge_count(), 6);
        assert!(k4.edges().iter().all(|&(u, v)| k4.has_edge(u, v)));
    }

    #[test]
    fn test_render() {
        assert_eq!(triangle().render(), "[0 1 1]\n[1 0 1]\n[1 1 0]");
    }

    #[test]
    fn test_serde_as_matrix() {
        let g = triangle();
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, "[[0,1,1],[1,0,1],[1,1,0]]");
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
        assert!(serde_json::from_str::<Graph>("[[0,1],[0,0]]").is_err());
    }
}
