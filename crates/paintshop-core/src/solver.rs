//! Classical reference solvers.
//!
//! Used to judge QAOA samples: the greedy heuristic is the usual baseline
//! for binary paintshop, and exhaustive search gives the true optimum for
//! small instances.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::coloring::{Coloring, paint_changes};
use crate::error::{PaintshopError, PaintshopResult};
use crate::ising::IsingModel;
use crate::sequence::Sequence;

/// Largest instance accepted by [`exhaustive`].
pub const MAX_EXHAUSTIVE_CARS: usize = 24;

/// A coloring together with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// First-occurrence colors by car index.
    pub coloring: Coloring,
    /// Color changes along the sequence.
    pub changes: usize,
}

/// Paint every first occurrence like the slot before it.
///
/// The first slot gets color 0; second occurrences are forced.
pub fn greedy(sequence: &Sequence) -> PaintshopResult<Solution> {
    let mut colors = vec![0u8; sequence.num_cars()];
    let mut painted: FxHashSet<u32> = FxHashSet::default();
    let mut previous = 0u8;

    for &car in sequence.as_slice() {
        let index = sequence.car_index(car).unwrap_or_default();
        previous = if painted.insert(car) {
            colors[index] = previous;
            previous
        } else {
            1 - colors[index]
        };
    }

    let coloring = Coloring::from_colors(colors)?;
    let changes = paint_changes(sequence, &coloring)?;
    Ok(Solution { coloring, changes })
}

/// Optimal coloring by brute force.
///
/// Car index 0 is pinned to color 0 since flipping every color preserves
/// the score, which halves the search space. Ties resolve to the lowest
/// enumeration index.
pub fn exhaustive(sequence: &Sequence) -> PaintshopResult<Solution> {
    let n = sequence.num_cars();
    if n > MAX_EXHAUSTIVE_CARS {
        return Err(PaintshopError::TooManyCars {
            cars: n,
            max: MAX_EXHAUSTIVE_CARS,
        });
    }
    if n == 0 {
        return Ok(Solution {
            coloring: Coloring::uniform(0),
            changes: 0,
        });
    }

    let model = IsingModel::from_sequence(sequence);
    let uniform = Coloring::uniform(n);
    let mut best = Solution {
        changes: model.color_changes(&uniform)?,
        coloring: uniform,
    };

    for free in 1..(1usize << (n - 1)) {
        let coloring = Coloring::from_index(free << 1, n);
        let changes = model.color_changes(&coloring)?;
        if changes < best.changes {
            best = Solution { coloring, changes };
        }
    }

    tracing::debug!(cars = n, changes = best.changes, "exhaustive search finished");
    Ok(best)
}
