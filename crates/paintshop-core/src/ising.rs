//! Ising form of a paintshop instance.
//!
//! Summing the interaction signs per car pair gives
//!
//! ```text
//! E(s) = Σ_{a<b} J_ab s_a s_b
//! ```
//!
//! and the number of color changes is `(m + E(s)) / 2 + d`, where `m` is
//! the number of interactions and `d` the number of cars whose two slots
//! are adjacent: every bond contributes one change exactly when its term
//! `J s_a s_b` is `+1`, and an adjacent pair always changes color.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coloring::Coloring;
use crate::error::{PaintshopError, PaintshopResult};
use crate::sequence::Sequence;

/// A ZZ coupling between two car indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupler {
    /// Lower car index.
    pub a: usize,
    /// Higher car index.
    pub b: usize,
    /// Net coupling constant.
    pub j: i32,
}

/// Aggregated spin glass of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsingModel {
    num_spins: usize,
    num_interactions: usize,
    adjacent_pairs: usize,
    couplers: Vec<Coupler>,
}

impl IsingModel {
    /// Aggregate the interactions of a sequence.
    ///
    /// Couplers are ordered by `(a, b)`; pairs whose signs cancel are dropped.
    pub fn from_sequence(sequence: &Sequence) -> Self {
        let mut sums: BTreeMap<(usize, usize), i32> = BTreeMap::new();
        let mut num_interactions = 0;

        for interaction in sequence.interactions() {
            num_interactions += 1;
            let (Some(a), Some(b)) = (
                sequence.car_index(interaction.a),
                sequence.car_index(interaction.b),
            ) else {
                continue;
            };
            let key = if a < b { (a, b) } else { (b, a) };
            *sums.entry(key).or_insert(0) += interaction.coupling.sign();
        }

        let couplers: Vec<Coupler> = sums
            .into_iter()
            .filter(|&(_, j)| j != 0)
            .map(|((a, b), j)| Coupler { a, b, j })
            .collect();

        tracing::debug!(
            spins = sequence.num_cars(),
            interactions = num_interactions,
            couplers = couplers.len(),
            "built Ising model"
        );

        Self {
            num_spins: sequence.num_cars(),
            num_interactions,
            adjacent_pairs: sequence.adjacent_pairs(),
            couplers,
        }
    }

    /// Number of spins (cars).
    pub fn num_spins(&self) -> usize {
        self.num_spins
    }

    /// Number of raw interactions the couplers were summed from.
    pub fn num_interactions(&self) -> usize {
        self.num_interactions
    }

    /// Cars painted in consecutive slots; each adds one fixed color change.
    pub fn adjacent_pairs(&self) -> usize {
        self.adjacent_pairs
    }

    /// Non-zero couplers in `(a, b)` order.
    pub fn couplers(&self) -> &[Coupler] {
        &self.couplers
    }

    /// `Σ J_ab s_a s_b` for spins in {+1, -1}.
    pub fn energy(&self, spins: &[i8]) -> PaintshopResult<i32> {
        if spins.len() != self.num_spins {
            return Err(PaintshopError::ColoringMismatch {
                expected: self.num_spins,
                found: spins.len(),
            });
        }
        Ok(self
            .couplers
            .iter()
            .map(|c| c.j * i32::from(spins[c.a]) * i32::from(spins[c.b]))
            .sum())
    }

    /// Color changes of a coloring, computed from the energy.
    pub fn color_changes(&self, coloring: &Coloring) -> PaintshopResult<usize> {
        let energy = self.energy(&coloring.spins())?;
        let bonds = (self.num_interactions as i32 + energy) / 2;
        Ok(bonds as usize + self.adjacent_pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::paint_changes;

    #[test]
    fn test_alternating_pair_aggregates() {
        // (0,1,-1) + (1,0,+1) + (0,1,-1) = -1
        let seq = Sequence::new(vec![0, 1, 0, 1]).unwrap();
        let model = IsingModel::from_sequence(&seq);
        assert_eq!(model.num_spins(), 2);
        assert_eq!(model.num_interactions(), 3);
        assert_eq!(model.couplers(), &[Coupler { a: 0, b: 1, j: -1 }]);
    }

    #[test]
    fn test_cancelling_pair_dropped() {
        // 0 1 1 0: (0,1,F) (1,0,F) -> J = -2
        let seq = Sequence::new(vec![0, 1, 1, 0]).unwrap();
        assert_eq!(
            IsingModel::from_sequence(&seq).couplers(),
            &[Coupler { a: 0, b: 1, j: -2 }]
        );

        // 0 1 2 1 0 2: (0,1,F) (1,2,F) (2,1,A) (1,0,F) (0,2,F)
        // pair (1,2) sums to zero
        let seq = Sequence::new(vec![0, 1, 2, 1, 0, 2]).unwrap();
        let model = IsingModel::from_sequence(&seq);
        assert_eq!(
            model.couplers(),
            &[Coupler { a: 0, b: 1, j: -2 }, Coupler { a: 0, b: 2, j: -1 }]
        );
    }

    #[test]
    fn test_energy_matches_changes_exhaustively() {
        let seq = Sequence::new(vec![0, 1, 2, 0, 3, 2, 1, 3]).unwrap();
        let model = IsingModel::from_sequence(&seq);
        for index in 0..(1 << seq.num_cars()) {
            let coloring = Coloring::from_index(index, seq.num_cars());
            assert_eq!(
                model.color_changes(&coloring).unwrap(),
                paint_changes(&seq, &coloring).unwrap(),
                "coloring {coloring}"
            );
        }
    }

    #[test]
    fn test_adjacent_pairs_add_fixed_changes() {
        let seq = Sequence::new(vec![0, 0, 1, 2, 2, 1]).unwrap();
        let model = IsingModel::from_sequence(&seq);
        assert_eq!(model.adjacent_pairs(), 2);
        for index in 0..(1 << seq.num_cars()) {
            let coloring = Coloring::from_index(index, seq.num_cars());
            assert_eq!(
                model.color_changes(&coloring).unwrap(),
                paint_changes(&seq, &coloring).unwrap()
            );
        }
    }

    #[test]
    fn test_energy_width_checked() {
        let seq = Sequence::new(vec![0, 1, 0, 1]).unwrap();
        let model = IsingModel::from_sequence(&seq);
        assert!(model.energy(&[1]).is_err());
    }
}
