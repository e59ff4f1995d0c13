//! Colorings and the color-change objective.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{PaintshopError, PaintshopResult};
use crate::sequence::Sequence;

/// First-occurrence colors, one per car index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Coloring(Vec<u8>);

impl Coloring {
    /// Build a coloring from explicit colors (each 0 or 1).
    pub fn from_colors(colors: Vec<u8>) -> PaintshopResult<Self> {
        if let Some(&bad) = colors.iter().find(|&&c| c > 1) {
            return Err(PaintshopError::InvalidColor(bad));
        }
        Ok(Self(colors))
    }

    /// Decode a measurement bitstring over `num_cars` qubits.
    ///
    /// Bitstrings are little-endian: the right-most character is qubit 0.
    pub fn from_bitstring(bits: &str, num_cars: usize) -> PaintshopResult<Self> {
        if bits.len() != num_cars {
            return Err(PaintshopError::InvalidBitstring(format!(
                "'{bits}' has {} bits, expected {num_cars}",
                bits.len()
            )));
        }
        bits.bytes()
            .rev()
            .map(|b| match b {
                b'0' => Ok(0),
                b'1' => Ok(1),
                other => Err(PaintshopError::InvalidBitstring(format!(
                    "'{bits}' contains '{}'",
                    other as char
                ))),
            })
            .collect::<PaintshopResult<Vec<u8>>>()
            .map(Self)
    }

    /// Coloring whose car `k` takes bit `k` of `index` (0 beyond the width of `usize`).
    pub fn from_index(index: usize, num_cars: usize) -> Self {
        Self(
            (0..num_cars)
                .map(|k| {
                    let bit = u32::try_from(k).ok().and_then(|k| index.checked_shr(k));
                    (bit.unwrap_or(0) & 1) as u8
                })
                .collect(),
        )
    }

    /// All cars colored 0.
    pub fn uniform(num_cars: usize) -> Self {
        Self(vec![0; num_cars])
    }

    /// Colors by car index.
    pub fn colors(&self) -> &[u8] {
        &self.0
    }

    /// Number of cars covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no car is covered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every color inverted. Scores are invariant under this flip.
    pub fn flipped(&self) -> Self {
        Self(self.0.iter().map(|c| 1 - c).collect())
    }

    /// Ising spins (`color 0 → +1`, `color 1 → -1`).
    pub fn spins(&self) -> Vec<i8> {
        self.0.iter().map(|&c| if c == 0 { 1 } else { -1 }).collect()
    }

    /// Little-endian bitstring, the inverse of [`Coloring::from_bitstring`].
    pub fn to_bitstring(&self) -> String {
        self.0
            .iter()
            .rev()
            .map(|&c| if c == 0 { '0' } else { '1' })
            .collect()
    }
}

impl TryFrom<Vec<u8>> for Coloring {
    type Error = PaintshopError;

    fn try_from(colors: Vec<u8>) -> PaintshopResult<Self> {
        Self::from_colors(colors)
    }
}

impl From<Coloring> for Vec<u8> {
    fn from(coloring: Coloring) -> Self {
        coloring.0
    }
}

impl fmt::Display for Coloring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(u8::to_string).collect();
        write!(f, "[{}]", joined.join(", "))
    }
}

fn check_width(sequence: &Sequence, coloring: &Coloring) -> PaintshopResult<()> {
    if coloring.len() == sequence.num_cars() {
        Ok(())
    } else {
        Err(PaintshopError::ColoringMismatch {
            expected: sequence.num_cars(),
            found: coloring.len(),
        })
    }
}

/// The color painted at every slot of the sequence.
///
/// A car's first slot gets its coloring entry, the second slot the opposite.
pub fn paint_colors(sequence: &Sequence, coloring: &Coloring) -> PaintshopResult<Vec<u8>> {
    check_width(sequence, coloring)?;

    let mut painted: FxHashSet<u32> = FxHashSet::default();
    let colors = sequence
        .as_slice()
        .iter()
        .map(|&car| {
            // Validated sequences only hold known cars.
            let index = sequence.car_index(car).unwrap_or_default();
            let color = coloring.colors()[index];
            if painted.insert(car) { color } else { 1 - color }
        })
        .collect();
    Ok(colors)
}

/// Number of neighbouring slots painted with different colors.
pub fn paint_changes(sequence: &Sequence, coloring: &Coloring) -> PaintshopResult<usize> {
    let colors = paint_colors(sequence, coloring)?;
    Ok(colors.windows(2).filter(|w| w[0] != w[1]).count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: &[u32]) -> Sequence {
        Sequence::new(items.to_vec()).unwrap()
    }

    #[test]
    fn test_paint_changes_alternating() {
        // colors: 0 1 1 0 -> changes at 0|1 and 1|0
        let s = seq(&[0, 1, 0, 1]);
        let c = Coloring::from_colors(vec![0, 1]).unwrap();
        assert_eq!(paint_colors(&s, &c).unwrap(), vec![0, 1, 1, 0]);
        assert_eq!(paint_changes(&s, &c).unwrap(), 2);
    }

    #[test]
    fn test_paint_changes_optimum() {
        // colors: 0 0 1 1 -> one change
        let s = seq(&[0, 1, 0, 1]);
        let c = Coloring::from_colors(vec![0, 0]).unwrap();
        assert_eq!(paint_changes(&s, &c).unwrap(), 1);
    }

    #[test]
    fn test_adjacent_pair_always_changes() {
        let s = seq(&[0, 0]);
        assert_eq!(paint_changes(&s, &Coloring::uniform(1)).unwrap(), 1);
    }

    #[test]
    fn test_flip_invariance() {
        let s = seq(&[0, 1, 2, 0, 2, 1]);
        let c = Coloring::from_colors(vec![1, 0, 1]).unwrap();
        assert_eq!(
            paint_changes(&s, &c).unwrap(),
            paint_changes(&s, &c.flipped()).unwrap()
        );
    }

    #[test]
    fn test_width_mismatch() {
        let s = seq(&[0, 1, 0, 1]);
        let c = Coloring::from_colors(vec![0]).unwrap();
        assert!(matches!(
            paint_changes(&s, &c),
            Err(PaintshopError::ColoringMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_invalid_color() {
        assert!(matches!(
            Coloring::from_colors(vec![0, 2]),
            Err(PaintshopError::InvalidColor(2))
        ));
    }

    #[test]
    fn test_bitstring_is_little_endian() {
        let c = Coloring::from_bitstring("110", 3).unwrap();
        assert_eq!(c.colors(), &[0, 1, 1]);
        assert_eq!(c.to_bitstring(), "110");
    }

    #[test]
    fn test_bitstring_errors() {
        assert!(Coloring::from_bitstring("10", 3).is_err());
        assert!(Coloring::from_bitstring("1x0", 3).is_err());
    }

    #[test]
    fn test_from_index_matches_bitstring() {
        // 6 = 0b110
        assert_eq!(
            Coloring::from_index(6, 3),
            Coloring::from_bitstring("110", 3).unwrap()
        );
    }

    #[test]
    fn test_sparse_identifiers() {
        // Car 7 has index 0, car 40 index 1.
        let s = seq(&[40, 7, 7, 40]);
        let c = Coloring::from_colors(vec![1, 0]).unwrap();
        assert_eq!(paint_colors(&s, &c).unwrap(), vec![0, 1, 0, 1]);
    }
}
