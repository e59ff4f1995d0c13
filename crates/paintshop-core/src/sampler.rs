//! Measurement counts and the sampler seam.
//!
//! Circuit execution lives outside this crate. A [`Sampler`] wraps whatever
//! actually runs the circuit (a vendor SDK, a remote queue, a simulator)
//! and hands back [`Counts`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{PaintshopError, PaintshopResult};

/// Histogram of measured bitstrings.
///
/// Bitstrings are little-endian: the right-most character is bit 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<String, u64>);

impl Counts {
    /// Empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bitstring`, saturating at `u64::MAX`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        let entry = self.0.entry(bitstring.into()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Observations of one bitstring.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of shots.
    pub fn total_shots(&self) -> PaintshopResult<u64> {
        self.0
            .values()
            .try_fold(0u64, |total, &count| total.checked_add(count))
            .ok_or(PaintshopError::CountsOverflow)
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most frequent outcome; ties go to the lexicographically smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.0
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (bits, &count)| match best {
                Some((_, c)) if c >= count => best,
                _ => Some((bits.as_str(), count)),
            })
    }

    /// Outcomes in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(bits, &count)| (bits.as_str(), count))
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bits, count) in iter {
            counts.insert(bits, count);
        }
        counts
    }
}

/// Executes circuits and returns measurement counts.
pub trait Sampler {
    /// Short identifier used in logs and task records.
    fn name(&self) -> &str;

    /// Run `circuit` for `shots` shots.
    fn sample(&self, circuit: &Circuit, shots: u32) -> PaintshopResult<Counts>;
}

impl<S: Sampler + ?Sized> Sampler for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn sample(&self, circuit: &Circuit, shots: u32) -> PaintshopResult<Counts> {
        (**self).sample(circuit, shots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00", 3);
        counts.insert("11", 5);
        counts.insert("00", 2);
        assert_eq!(counts.get("00"), 5);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots().unwrap(), 10);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_total_shots_overflow() {
        let counts: Counts =
            serde_json::from_str(r#"{"00": 18446744073709551615, "01": 1}"#).unwrap();
        assert!(matches!(
            counts.total_shots(),
            Err(PaintshopError::CountsOverflow)
        ));

        let mut saturated = Counts::new();
        saturated.insert("00", u64::MAX);
        saturated.insert("00", 1);
        assert_eq!(saturated.get("00"), u64::MAX);
    }

    #[test]
    fn test_most_frequent_tie_break() {
        let counts: Counts = [("10".to_string(), 4), ("01".to_string(), 4)]
            .into_iter()
            .collect();
        assert_eq!(counts.most_frequent(), Some(("01", 4)));
        assert_eq!(Counts::new().most_frequent(), None);
    }

    #[test]
    fn test_counts_json_is_plain_map() {
        let mut counts = Counts::new();
        counts.insert("01", 7);
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"01":7}"#);
        let back: Counts = serde_json::from_str(r#"{"01":7}"#).unwrap();
        assert_eq!(back, counts);
    }
}
