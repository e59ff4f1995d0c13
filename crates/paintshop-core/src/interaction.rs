//! Spin-glass interactions of a paintshop sequence.
//!
//! Each car carries one binary spin: the color of its first slot. Two
//! neighbouring slots want the same color. When both slots are first
//! occurrences (or both second occurrences) that means equal spins, a
//! ferromagnetic bond. When exactly one of them is a second occurrence its
//! color is the inverted spin, so the bond is antiferromagnetic.
//!
//! Signs follow the energy convention `E = Σ J s_a s_b`: ferromagnetic
//! bonds have `J = -1`, antiferromagnetic bonds `J = +1`.
//!
//! ```text
//!  slot:   0   1   2   3
//!  car:    0   1   0   1
//!  seen:   1st 1st 2nd 2nd
//!            F   A   F
//! ```

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Kind of bond between two neighbouring cars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coupling {
    /// Favors equal spins.
    Ferromagnetic,
    /// Favors opposite spins.
    Antiferromagnetic,
}

impl Coupling {
    /// Coupling constant in the `E = Σ J s_a s_b` convention.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Coupling::Ferromagnetic => -1,
            Coupling::Antiferromagnetic => 1,
        }
    }

    /// Short label used in tables.
    pub fn label(self) -> &'static str {
        match self {
            Coupling::Ferromagnetic => "ferro",
            Coupling::Antiferromagnetic => "antiferro",
        }
    }
}

/// A bond between the cars at two neighbouring slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interaction {
    /// Car at the earlier slot.
    pub a: u32,
    /// Car at the later slot.
    pub b: u32,
    /// Bond kind.
    pub coupling: Coupling,
}

impl Interaction {
    /// Create an interaction.
    pub fn new(a: u32, b: u32, coupling: Coupling) -> Self {
        Self { a, b, coupling }
    }

    /// The `(a, b, sign)` triple.
    pub fn as_triple(&self) -> (u32, u32, i32) {
        (self.a, self.b, self.coupling.sign())
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {:+})", self.a, self.b, self.coupling.sign())
    }
}

/// Lazily extract interactions from a raw sequence.
///
/// The input is not validated: any slice is accepted and processed in a
/// single pass. Use [`crate::Sequence`] to reject malformed input first.
pub fn interactions(sequence: &[u32]) -> Interactions<'_> {
    Interactions {
        sequence,
        pos: 0,
        seen: FxHashSet::default(),
        prev: None,
    }
}

/// Iterator returned by [`interactions`].
///
/// Holds the set of cars already painted once; it is private to one pass,
/// so restarting means calling [`interactions`] again.
#[derive(Debug, Clone)]
pub struct Interactions<'a> {
    sequence: &'a [u32],
    pos: usize,
    seen: FxHashSet<u32>,
    /// Car at the previous slot and whether that slot was its first occurrence.
    prev: Option<(u32, bool)>,
}

impl Iterator for Interactions<'_> {
    type Item = Interaction;

    fn next(&mut self) -> Option<Interaction> {
        while let Some(&car) = self.sequence.get(self.pos) {
            self.pos += 1;
            let first = self.seen.insert(car);
            let Some((prev_car, prev_first)) = self.prev.replace((car, first)) else {
                continue;
            };
            if prev_car == car {
                continue;
            }
            let coupling = if prev_first == first {
                Coupling::Ferromagnetic
            } else {
                Coupling::Antiferromagnetic
            };
            return Some(Interaction::new(prev_car, car, coupling));
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sequence.len() - self.pos;
        let upper = if self.prev.is_some() {
            remaining
        } else {
            remaining.saturating_sub(1)
        };
        (0, Some(upper))
    }
}

impl std::iter::FusedIterator for Interactions<'_> {}
