//! ColorPermutation — a random bijection over the color labels 1..=k
//!
//! Relabels a coloring between rounds: equality and inequality of colors are
//! preserved, the concrete labels are not.

use crate::graph::Color;
use rand::seq::SliceRandom;
use rand::Rng;

/// π: [1, k] → [1, k], stored as `targets[c - 1] = π(c)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    targets: Vec<Color>,
}

impl Permutation {
    /// Uniformly random bijection via Fisher–Yates over the identity sequence
    pub fn random<R: Rng + ?Sized>(k: u8, rng: &mut R) -> Self {
        let mut targets: Vec<Color> = (1..=k).collect();
        targets.shuffle(rng);
        Self { targets }
    }

    pub fn identity(k: u8) -> Self {
        Self {
            targets: (1..=k).collect(),
        }
    }

    /// Build from explicit targets, checking every label in 1..=k appears once
    pub fn from_targets(targets: Vec<Color>) -> Result<Self, PermutationError> {
        let k = targets.len();
        if k > Color::MAX as usize {
            return Err(PermutationError::TooManyColors(k));
        }
        let mut seen = vec![false; k];
        for &t in &targets {
            if t == 0 || t as usize > k {
                return Err(PermutationError::ColorOutOfRange { color: t, k: k as u8 });
            }
            if std::mem::replace(&mut seen[t as usize - 1], true) {
                return Err(PermutationError::NotABijection { repeated: t });
            }
        }
        Ok(Self { targets })
    }

    pub fn k(&self) -> u8 {
        self.targets.len() as u8
    }

    /// π(c), or `None` when `c` is outside 1..=k
    pub fn apply(&self, color: Color) -> Option<Color> {
        if color == 0 {
            return None;
        }
        self.targets.get(color as usize - 1).copied()
    }

    pub fn targets(&self) -> &[Color] {
        &self.targets
    }

    pub fn is_bijection(&self) -> bool {
        Self::from_targets(self.targets.clone()).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermutationError {
    #[error("color {color} outside 1..={k}")]
    ColorOutOfRange { color: Color, k: u8 },

    #[error("color {repeated} is targeted more than once")]
    NotABijection { repeated: Color },

    #[error("coloring uses {coloring} colors but the permutation covers {permutation}")]
    ColorCountMismatch { coloring: u8, permutation: u8 },

    #[error("{0} colors exceed the color label range")]
    TooManyColors(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_random_is_bijection() {
        let mut rng = StdRng::seed_from_u64(7);
        for k in 1..=9u8 {
            for _ in 0..50 {
                let p = Permutation::random(k, &mut rng);
                assert_eq!(p.k(), k);
                assert!(p.is_bijection());
                let image: HashSet<Color> = (1..=k).filter_map(|c| p.apply(c)).collect();
                assert_eq!(image, (1..=k).collect::<HashSet<Color>>());
            }
        }
    }

    #[test]
    fn test_random_covers_all_permutations_of_three() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<Vec<Color>> = (0..600)
            .map(|_| Permutation::random(3, &mut rng).targets().to_vec())
            .collect();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_from_targets_validation() {
        assert!(Permutation::from_targets(vec![2, 3, 1]).is_ok());
        assert_eq!(
            Permutation::from_targets(vec![1, 1, 3]),
            Err(PermutationError::NotABijection { repeated: 1 })
        );
        assert_eq!(
            Permutation::from_targets(vec![1, 4, 2]),
            Err(PermutationError::ColorOutOfRange { color: 4, k: 3 })
        );
        assert!(Permutation::from_targets(vec![0, 1]).is_err());
    }

    #[test]
    fn test_apply() {
        let p = Permutation::from_targets(vec![3, 1, 2]).unwrap();
        assert_eq!(p.apply(1), Some(3));
        assert_eq!(p.apply(3), Some(2));
        assert_eq!(p.apply(0), None);
        assert_eq!(p.apply(4), None);
        assert_eq!(Permutation::identity(3).apply(2), Some(2));
    }
}
