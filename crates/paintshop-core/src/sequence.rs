//! Paintshop sequences.
//!
//! A sequence lists the cars in the order they pass through the paint shop.
//! Every car appears exactly twice; the two slots are indistinguishable
//! except by position. The first slot receives the car's chosen color and
//! the second slot the opposite one.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};

use crate::error::{PaintshopError, PaintshopResult};
use crate::interaction::{Interactions, interactions};

/// A validated paintshop sequence.
///
/// Cars are addressed in two ways: by their identifier as it appears in the
/// sequence, and by a dense *car index* `0..num_cars()` assigned in
/// ascending identifier order. Qubits and coloring slots use car indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Sequence {
    items: Vec<u32>,
    /// Distinct identifiers, ascending.
    cars: Vec<u32>,
}

impl Sequence {
    /// Validate a sequence.
    ///
    /// Fails with [`PaintshopError::MalformedSequence`] on the first
    /// identifier (in ascending order) that does not occur exactly twice.
    pub fn new(items: Vec<u32>) -> PaintshopResult<Self> {
        let mut occurrences: FxHashMap<u32, usize> = FxHashMap::default();
        for &car in &items {
            *occurrences.entry(car).or_insert(0) += 1;
        }

        let mut cars: Vec<u32> = occurrences.keys().copied().collect();
        cars.sort_unstable();

        if let Some(&car) = cars.iter().find(|car| occurrences[car] != 2) {
            return Err(PaintshopError::MalformedSequence {
                car,
                occurrences: occurrences[&car],
            });
        }

        Ok(Self { items, cars })
    }

    /// Parse a sequence from text such as `"0,1,0,1"`, `"0 1 0 1"` or `"[0, 1, 0, 1]"`.
    pub fn parse(text: &str) -> PaintshopResult<Self> {
        let trimmed = text.trim().trim_start_matches('[').trim_end_matches(']');
        let items = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<u32>()
                    .map_err(|e| PaintshopError::ParseSequence(format!("'{token}': {e}")))
            })
            .collect::<PaintshopResult<Vec<_>>>()?;
        Self::new(items)
    }

    /// A reproducible random instance with cars `0..num_cars`.
    pub fn random(num_cars: u32, seed: u64) -> Self {
        let mut items: Vec<u32> = (0..num_cars).flat_map(|car| [car, car]).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        items.shuffle(&mut rng);
        let cars = (0..num_cars).collect();
        Self { items, cars }
    }

    /// The sequence as identifiers in order.
    pub fn as_slice(&self) -> &[u32] {
        &self.items
    }

    /// Number of slots (twice the number of cars).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for the empty sequence.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct cars.
    pub fn num_cars(&self) -> usize {
        self.cars.len()
    }

    /// Distinct car identifiers in ascending order; position = car index.
    pub fn cars(&self) -> &[u32] {
        &self.cars
    }

    /// Dense index of a car identifier, if the car is part of the sequence.
    pub fn car_index(&self, car: u32) -> Option<usize> {
        self.cars.binary_search(&car).ok()
    }

    /// Lazily extract the spin-glass interactions of this sequence.
    pub fn interactions(&self) -> Interactions<'_> {
        interactions(&self.items)
    }

    /// Number of adjacent slots holding the same car.
    pub fn adjacent_pairs(&self) -> usize {
        self.items.windows(2).filter(|w| w[0] == w[1]).count()
    }

    /// Short identifier for file and task names: car count plus a hash of the slot order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = FxHasher::default();
        self.items.hash(&mut hasher);
        format!("{}c-{:016x}", self.num_cars(), hasher.finish())
    }

    /// The same cars in reverse order.
    pub fn reversed(&self) -> Self {
        let mut items = self.items.clone();
        items.reverse();
        Self {
            items,
            cars: self.cars.clone(),
        }
    }
}

impl TryFrom<Vec<u32>> for Sequence {
    type Error = PaintshopError;

    fn try_from(items: Vec<u32>) -> PaintshopResult<Self> {
        Self::new(items)
    }
}

impl From<Sequence> for Vec<u32> {
    fn from(sequence: Sequence) -> Self {
        sequence.items
    }
}

impl FromStr for Sequence {
    type Err = PaintshopError;

    fn from_str(s: &str) -> PaintshopResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.items.iter().map(u32::to_string).collect();
        write!(f, "[{}]", joined.join(", "))
    }
}
