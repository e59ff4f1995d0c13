//! Error types for the core crate.

use thiserror::Error;

/// Errors produced while building, scoring or sampling paintshop instances.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaintshopError {
    /// A car identifier occurs a number of times other than exactly two.
    #[error("Malformed sequence: car {car} occurs {occurrences} time(s), expected exactly 2")]
    MalformedSequence {
        /// The offending identifier.
        car: u32,
        /// How often it occurs.
        occurrences: usize,
    },

    /// The textual sequence could not be parsed.
    #[error("Cannot parse sequence: {0}")]
    ParseSequence(String),

    /// A coloring does not cover every car exactly once.
    #[error("Coloring has {found} entries but the sequence has {expected} cars")]
    ColoringMismatch {
        /// Number of cars in the sequence.
        expected: usize,
        /// Number of colors supplied.
        found: usize,
    },

    /// A color outside {0, 1}.
    #[error("Invalid color {0}: colors are 0 or 1")]
    InvalidColor(u8),

    /// A measurement bitstring that cannot be mapped onto the cars.
    #[error("Invalid bitstring: {0}")]
    InvalidBitstring(String),

    /// A circuit instruction references a qubit or bit outside the circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Counts contained no shots.
    #[error("Measurement counts are empty")]
    EmptyCounts,

    /// Shot totals do not fit in 64 bits.
    #[error("Measurement counts overflow: more than {} shots", u64::MAX)]
    CountsOverflow,

    /// An angle or coupling strength that is NaN or infinite.
    #[error("Non-finite {name}: {value}")]
    NonFinite {
        /// Which parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Instance too large for exhaustive search.
    #[error("Exhaustive search is limited to {max} cars, got {cars}")]
    TooManyCars {
        /// Cars in the instance.
        cars: usize,
        /// Upper limit.
        max: usize,
    },

    /// The external sampler failed.
    #[error("Sampler error: {0}")]
    Sampler(String),

    /// The optimizer was misconfigured or failed.
    #[error("Optimizer error: {0}")]
    Optimizer(String),
}

/// Result type for paintshop operations.
pub type PaintshopResult<T> = Result<T, PaintshopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PaintshopError::MalformedSequence {
            car: 3,
            occurrences: 1,
        };
        assert_eq!(
            err.to_string(),
            "Malformed sequence: car 3 occurs 1 time(s), expected exactly 2"
        );

        let err = PaintshopError::ColoringMismatch {
            expected: 4,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Coloring has 2 entries but the sequence has 4 cars"
        );
    }
}
