//! Witness — the Prover's private, permuted coloring for one round

use super::{Permutation, PermutationError};
use crate::graph::{Color, Coloring};

/// Coloring composed with a permutation: vertex → π(c(vertex))
///
/// Held only by the Prover and dropped at the end of its round. It is
/// deliberately not serializable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    colors: Vec<Color>,
    k: u8,
}

impl Witness {
    /// Compose `coloring` with `permutation`
    pub fn new(coloring: &Coloring, permutation: &Permutation) -> Result<Self, PermutationError> {
        if permutation.k() != coloring.k() {
            return Err(PermutationError::ColorCountMismatch {
                coloring: coloring.k(),
                permutation: permutation.k(),
            });
        }
        let colors = coloring
            .colors()
            .iter()
            .map(|&c| {
                permutation
                    .apply(c)
                    .ok_or(PermutationError::ColorOutOfRange { color: c, k: permutation.k() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            colors,
            k: coloring.k(),
        })
    }

    /// Wrap already-permuted colors as-is
    pub fn from_colors(colors: Vec<Color>, k: u8) -> Self {
        Self { colors, k }
    }

    /// The committed color of `v`; `None` means the witness has no entry
    pub fn color_of(&self, v: usize) -> Option<Color> {
        self.colors.get(v).copied()
    }

    pub fn k(&self) -> u8 {
        self.k
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub(crate) fn colors(&self) -> &[Color] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BuiltinGraph, ColoringSolver, GraphSource};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_witness_preserves_edge_inequality() {
        let graph = BuiltinGraph.load_graph().unwrap();
        let coloring = ColoringSolver::new(3).solve(&graph).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let witness = Witness::new(&coloring, &Permutation::random(3, &mut rng)).unwrap();
            for (u, v) in graph.edges() {
                assert_ne!(witness.color_of(u), witness.color_of(v));
            }
        }
    }

    #[test]
    fn test_witness_relabels_colors() {
        let coloring = Coloring::from_colors(vec![1, 2, 3, 1], 3);
        let p = Permutation::from_targets(vec![2, 3, 1]).unwrap();
        let witness = Witness::new(&coloring, &p).unwrap();
        assert_eq!(witness.colors(), &[2, 3, 1, 2]);
        assert_eq!(witness.color_of(4), None);
    }

    #[test]
    fn test_witness_rejects_mismatched_k() {
        let coloring = Coloring::from_colors(vec![1, 2], 3);
        assert!(Witness::new(&coloring, &Permutation::identity(2)).is_err());

        let uncolored = Coloring::from_colors(vec![1, 0], 3);
        assert!(Witness::new(&uncolored, &Permutation::identity(3)).is_err());
    }
}
