//! Binary Paintshop as an Ising Spin Glass
//!
//! A binary paintshop instance is a sequence in which every car appears
//! exactly twice. Each car receives one color on its first visit and the
//! other color on its second; the goal is to minimize the number of color
//! changes along the line. This crate turns an instance into an Ising model
//! and builds the single-block QAOA circuit that samples low-energy
//! colorings.
//!
//! # Core Components
//!
//! - **Sequences**: [`Sequence`] validates and indexes car sequences
//! - **Interactions**: [`interactions`] extracts the ferro/antiferromagnetic
//!   couplings between consecutive cars
//! - **Ising model**: [`IsingModel`] sums the couplings per car pair
//! - **Scoring**: [`Coloring`], [`paint_changes`] and the [`solver`] baselines
//! - **QAOA**: [`qaoa_circuit`], [`QaoaRunner`] and the [`Sampler`] /
//!   [`Optimizer`] seams for external execution and classical optimization
//!
//! # Example
//!
//! ```rust
//! use paintshop_core::{Sequence, solver};
//!
//! let seq: Sequence = "[0, 1, 0, 1]".parse().unwrap();
//!
//! let triples: Vec<_> = seq.interactions().map(|i| i.as_triple()).collect();
//! assert_eq!(triples, vec![(0, 1, -1), (1, 0, 1), (0, 1, -1)]);
//!
//! let best = solver::exhaustive(&seq).unwrap();
//! assert_eq!(best.changes, 1);
//! ```

pub mod circuit;
pub mod coloring;
pub mod error;
pub mod interaction;
pub mod ising;
pub mod optimizer;
pub mod qaoa;
pub mod qasm;
pub mod sampler;
pub mod sequence;
pub mod solver;

pub use circuit::{Circuit, ClbitId, Gate, Instruction, QubitId};
pub use coloring::{Coloring, paint_changes, paint_colors};
pub use error::{PaintshopError, PaintshopResult};
pub use interaction::{Coupling, Interaction, Interactions, interactions};
pub use ising::{Coupler, IsingModel};
pub use optimizer::{GridSearch, OptimizationResult, Optimizer, ParameterBounds};
pub use qaoa::{
    Evaluation, QaoaOutcome, QaoaParams, QaoaRunner, SampleAnalysis, analyze_counts, qaoa_circuit,
};
pub use qasm::emit as emit_qasm3;
pub use sampler::{Counts, Sampler};
pub use sequence::Sequence;
pub use solver::{MAX_EXHAUSTIVE_CARS, Solution};
