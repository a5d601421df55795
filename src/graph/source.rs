//! Graph providers
//!
//! The protocol only needs `load_graph()`; where the matrix comes from is
//! the caller's business.

use super::{Graph, GraphError};
use log::info;
use std::path::PathBuf;

/// Supplies the public graph at process start
pub trait GraphSource {
    fn load_graph(&self) -> Result<Graph, GraphError>;
}

/// The hardcoded 10-vertex 3-colorable demo graph: a 5-cycle 0..4 with one
/// extra vertex hanging off each cycle edge
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinGraph;

impl BuiltinGraph {
    pub const MATRIX: [[u8; 10]; 10] = [
        [0, 1, 0, 0, 1, 1, 0, 0, 0, 1],
        [1, 0, 1, 0, 0, 1, 1, 0, 0, 0],
        [0, 1, 0, 1, 0, 0, 1, 1, 0, 0],
        [0, 0, 1, 0, 1, 0, 0, 1, 1, 0],
        [1, 0, 0, 1, 0, 0, 0, 0, 1, 1],
        [1, 1, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 1, 0, 0, 0, 0, 0, 0, 0],
        [0, 0, 1, 1, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 1, 1, 0, 0, 0, 0, 0],
        [1, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    ];
}

impl GraphSource for BuiltinGraph {
    fn load_graph(&self) -> Result<Graph, GraphError> {
        Graph::from_matrix(Self::MATRIX.iter().map(|row| row.to_vec()).collect())
    }
}

/// A JSON file holding the adjacency matrix as `[[0,1,...],...]`
#[derive(Debug, Clone)]
pub struct JsonGraphFile {
    pub path: PathBuf,
}

impl JsonGraphFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for JsonGraphFile {
    fn load_graph(&self) -> Result<Graph, GraphError> {
        let json = std::fs::read_to_string(&self.path)?;
        let matrix: Vec<Vec<u8>> = serde_json::from_str(&json)?;
        let graph = Graph::from_matrix(matrix)?;
        info!("Loaded {} from {}", graph.summary(), self.path.display());
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_graph_shape() {
        let graph = BuiltinGraph.load_graph().unwrap();
        assert_eq!(graph.vertex_count(), 10);
        assert_eq!(graph.edge_count(), 15);
        // The outer 5-cycle
        for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)] {
            assert!(graph.has_edge(u, v));
        }
        assert_eq!(graph.neighbors(5).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_json_graph_file() {
        let path = std::env::temp_dir().join(format!("zk3c-graph-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[[0,1,1],[1,0,1],[1,1,0]]").unwrap();
        let graph = JsonGraphFile::new(&path).load_graph().unwrap();
        assert_eq!(graph, Graph::complete(3));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_json_graph_file_errors() {
        let missing = JsonGraphFile::new("/nonexistent/zk3c/graph.json");
        assert!(matches!(missing.load_graph(), Err(GraphError::Io(_))));

        let path = std::env::temp_dir().join(format!("zk3c-bad-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonGraphFile::new(&path).load_graph(),
            Err(GraphError::Parse(_))
        ));
        std::fs::write(&path, "[[0,1],[0,0]]").unwrap();
        assert!(matches!(
            JsonGraphFile::new(&path).load_graph(),
            Err(GraphError::Asymmetric { .. })
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
