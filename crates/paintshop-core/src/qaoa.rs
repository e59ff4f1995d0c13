//! Single-block QAOA for binary paintshop.
//!
//! The circuit prepares `|+⟩^n`, applies the cost unitary
//! `exp(-i γ λ Σ J_ab Z_a Z_b)` and the mixer `exp(-i β Σ X_k)`, then
//! measures every qubit. Measured bitstrings are read as first-occurrence
//! colorings and scored by the number of color changes they produce.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, QubitId};
use crate::coloring::Coloring;
use crate::error::{PaintshopError, PaintshopResult};
use crate::ising::IsingModel;
use crate::optimizer::{OptimizationResult, Optimizer};
use crate::sampler::{Counts, Sampler};
use crate::sequence::Sequence;
use crate::solver::Solution;

/// Angles of the single QAOA block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QaoaParams {
    /// Cost angle.
    pub gamma: f64,
    /// Mixer angle.
    pub beta: f64,
}

impl QaoaParams {
    /// Create a parameter pair.
    pub fn new(gamma: f64, beta: f64) -> Self {
        Self { gamma, beta }
    }

    /// Read `[γ, β]` from an optimizer vector.
    pub fn from_slice(params: &[f64]) -> PaintshopResult<Self> {
        match params {
            [gamma, beta] => Ok(Self::new(*gamma, *beta)),
            other => Err(PaintshopError::Optimizer(format!(
                "expected [gamma, beta], got {} values",
                other.len()
            ))),
        }
    }

    /// `[γ, β]` as an optimizer vector.
    pub fn to_vec(self) -> Vec<f64> {
        vec![self.gamma, self.beta]
    }
}

/// Build the measured single-block QAOA circuit for an Ising model.
///
/// Qubit `k` carries the spin of car index `k`; `coupling_strength`
/// scales every `J_ab`.
pub fn qaoa_circuit(
    model: &IsingModel,
    params: QaoaParams,
    coupling_strength: f64,
) -> PaintshopResult<Circuit> {
    check_finite("gamma", params.gamma)?;
    check_finite("beta", params.beta)?;
    check_finite("coupling strength", coupling_strength)?;

    let n = u32::try_from(model.num_spins())
        .map_err(|_| PaintshopError::InvalidCircuit("too many spins".into()))?;
    let mut circuit = Circuit::with_size("paintshop_qaoa", n, n);

    for q in 0..n {
        circuit.h(QubitId(q))?;
    }

    // exp(-i γ λ J Z_a Z_b) = RZZ(2 γ λ J)
    for coupler in model.couplers() {
        let angle = 2.0 * params.gamma * coupling_strength * f64::from(coupler.j);
        circuit.rzz(
            angle,
            QubitId(coupler.a as u32),
            QubitId(coupler.b as u32),
        )?;
    }

    // exp(-i β X) = RX(2β)
    for q in 0..n {
        circuit.rx(2.0 * params.beta, QubitId(q))?;
    }

    circuit.measure_all()?;
    Ok(circuit)
}

fn check_finite(name: &'static str, value: f64) -> PaintshopResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PaintshopError::NonFinite { name, value })
    }
}

/// Scored view of a batch of measurement counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleAnalysis {
    /// Total shots.
    pub shots: u64,
    /// Shot-weighted mean number of color changes.
    pub mean_changes: f64,
    /// Lowest-scoring coloring observed (first in bitstring order on ties).
    pub best: Solution,
    /// Coloring of the most frequent bitstring.
    pub most_frequent: Solution,
    /// Shots per number of color changes.
    pub change_histogram: BTreeMap<usize, u64>,
}

impl SampleAnalysis {
    /// Fraction of shots that reached `changes` or fewer color changes.
    pub fn fraction_at_most(&self, changes: usize) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        let hits: u64 = self.change_histogram.range(..=changes).map(|(_, c)| c).sum();
        hits as f64 / self.shots as f64
    }
}

/// Score every bitstring in `counts` against `sequence`.
pub fn analyze_counts(sequence: &Sequence, counts: &Counts) -> PaintshopResult<SampleAnalysis> {
    let shots = counts.total_shots()?;
    if shots == 0 {
        return Err(PaintshopError::EmptyCounts);
    }

    let model = IsingModel::from_sequence(sequence);
    let n = sequence.num_cars();

    let mut weighted = 0u64;
    let mut best: Option<Solution> = None;
    let mut most_frequent: Option<(Solution, u64)> = None;
    let mut change_histogram = BTreeMap::new();

    for (bits, count) in counts.iter() {
        if count == 0 {
            continue;
        }
        let coloring = Coloring::from_bitstring(bits, n)?;
        let changes = model.color_changes(&coloring)?;
        weighted = (changes as u64)
            .checked_mul(count)
            .and_then(|w| weighted.checked_add(w))
            .ok_or(PaintshopError::CountsOverflow)?;
        *change_histogram.entry(changes).or_insert(0) += count;

        let solution = Solution { coloring, changes };
        if best.as_ref().is_none_or(|b| changes < b.changes) {
            best = Some(solution.clone());
        }
        if most_frequent.as_ref().is_none_or(|(_, c)| count > *c) {
            most_frequent = Some((solution, count));
        }
    }

    let (Some(best), Some((most_frequent, _))) = (best, most_frequent) else {
        return Err(PaintshopError::EmptyCounts);
    };

    Ok(SampleAnalysis {
        shots,
        mean_changes: weighted as f64 / shots as f64,
        best,
        most_frequent,
        change_histogram,
    })
}

/// One sampled parameter point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Angles used.
    pub params: QaoaParams,
    /// Raw counts returned by the sampler.
    pub counts: Counts,
    /// Scores derived from the counts.
    pub analysis: SampleAnalysis,
}

/// Result of a full optimization loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaoaOutcome {
    /// Evaluation with the lowest mean number of color changes.
    pub best: Evaluation,
    /// Optimizer trace.
    pub optimization: OptimizationResult,
}

/// Drives circuit construction, sampling and scoring for one sequence.
#[derive(Debug, Clone)]
pub struct QaoaRunner {
    sequence: Sequence,
    model: IsingModel,
    /// Scale applied to every coupling constant.
    pub coupling_strength: f64,
    /// Shots per evaluation.
    pub shots: u32,
}

impl QaoaRunner {
    /// Create a runner with unit coupling strength and 1024 shots.
    pub fn new(sequence: Sequence) -> Self {
        let model = IsingModel::from_sequence(&sequence);
        Self {
            sequence,
            model,
            coupling_strength: 1.0,
            shots: 1024,
        }
    }

    /// Set the coupling strength.
    pub fn with_coupling_strength(mut self, coupling_strength: f64) -> Self {
        self.coupling_strength = coupling_strength;
        self
    }

    /// Set the number of shots.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// The sequence being solved.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Its Ising model.
    pub fn model(&self) -> &IsingModel {
        &self.model
    }

    /// The measured circuit for `params`.
    pub fn circuit(&self, params: QaoaParams) -> PaintshopResult<Circuit> {
        qaoa_circuit(&self.model, params, self.coupling_strength)
    }

    /// Sample one parameter point and score it.
    pub fn evaluate<S: Sampler>(
        &self,
        sampler: &S,
        params: QaoaParams,
    ) -> PaintshopResult<Evaluation> {
        let circuit = self.circuit(params)?;
        let counts = sampler.sample(&circuit, self.shots)?;
        let analysis = analyze_counts(&self.sequence, &counts)?;
        tracing::debug!(
            sampler = sampler.name(),
            gamma = params.gamma,
            beta = params.beta,
            mean_changes = analysis.mean_changes,
            best_changes = analysis.best.changes,
            "evaluated QAOA point"
        );
        Ok(Evaluation {
            params,
            counts,
            analysis,
        })
    }

    /// Minimize the mean number of color changes over `(γ, β)`.
    pub fn optimize<S: Sampler, O: Optimizer>(
        &self,
        sampler: &S,
        optimizer: &O,
        initial: Option<QaoaParams>,
    ) -> PaintshopResult<QaoaOutcome> {
        let mut evaluations: Vec<Evaluation> = Vec::new();
        let initial = initial.map(QaoaParams::to_vec).unwrap_or_default();

        let optimization = optimizer.minimize(
            |raw| {
                let evaluation = self.evaluate(sampler, QaoaParams::from_slice(raw)?)?;
                let value = evaluation.analysis.mean_changes;
                evaluations.push(evaluation);
                Ok(value)
            },
            initial,
        )?;

        let best = evaluations
            .into_iter()
            .reduce(|best, e| {
                if e.analysis.mean_changes < best.analysis.mean_changes {
                    e
                } else {
                    best
                }
            })
            .ok_or_else(|| PaintshopError::Optimizer("optimizer never evaluated".into()))?;

        tracing::info!(
            evaluations = optimization.num_evaluations,
            gamma = best.params.gamma,
            beta = best.params.beta,
            mean_changes = best.analysis.mean_changes,
            "QAOA optimization finished"
        );

        Ok(QaoaOutcome { best, optimization })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Gate, Instruction};

    #[test]
    fn test_circuit_structure() {
        let seq = Sequence::new(vec![0, 1, 2, 1, 0, 2]).unwrap();
        let model = IsingModel::from_sequence(&seq);
        let circuit = qaoa_circuit(&model, QaoaParams::new(0.5, 0.25), 1.0).unwrap();

        let ops = circuit.count_ops();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(ops["h"], 3);
        assert_eq!(ops["rzz"], model.couplers().len());
        assert_eq!(ops["rx"], 3);
        assert_eq!(ops["measure"], 3);
    }

    #[test]
    fn test_cost_angles_scale_with_coupling() {
        // Single coupler J = -1 between cars 0 and 1.
        let seq = Sequence::new(vec![0, 1, 0, 1]).unwrap();
        let model = IsingModel::from_sequence(&seq);
        let circuit = qaoa_circuit(&model, QaoaParams::new(0.5, 0.25), 2.0).unwrap();

        let rzz: Vec<f64> = circuit
            .instructions()
            .iter()
            .filter_map(|i| match i {
                Instruction::Gate {
                    gate: Gate::Rzz(theta),
                    ..
                } => Some(*theta),
                _ => None,
            })
            .collect();
        assert_eq!(rzz, vec![-2.0]);

        let rx: Vec<f64> = circuit
            .instructions()
            .iter()
            .filter_map(|i| match i {
                Instruction::Gate {
                    gate: Gate::Rx(theta),
                    ..
                } => Some(*theta),
                _ => None,
            })
            .collect();
        assert_eq!(rx, vec![0.5, 0.5]);
    }

    #[test]
    fn test_analyze_counts() {
        // [0,1,0,1]: "00" and "11" -> 1 change, "01" and "10" -> 2 changes.
        let seq = Sequence::new(vec![0, 1, 0, 1]).unwrap();
        let mut counts = Counts::new();
        counts.insert("00", 6);
        counts.insert("01", 3);
        counts.insert("11", 1);

        let analysis = analyze_counts(&seq, &counts).unwrap();
        assert_eq!(analysis.shots, 10);
        assert!((analysis.mean_changes - 1.3).abs() < 1e-12);
        assert_eq!(analysis.best.changes, 1);
        assert_eq!(analysis.best.coloring.colors(), &[0, 0]);
        assert_eq!(analysis.most_frequent.coloring.colors(), &[0, 0]);
        assert_eq!(analysis.change_histogram[&1], 7);
        assert_eq!(analysis.change_histogram[&2], 3);
        assert!((analysis.fraction_at_most(1) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_rejects_bad_input() {
        let seq = Sequence::new(vec![0, 1, 0, 1]).unwrap();
        assert!(matches!(
            analyze_counts(&seq, &Counts::new()),
            Err(PaintshopError::EmptyCounts)
        ));

        let mut counts = Counts::new();
        counts.insert("010", 1);
        assert!(matches!(
            analyze_counts(&seq, &counts),
            Err(PaintshopError::InvalidBitstring(_))
        ));
    }

    #[test]
    fn test_analyze_rejects_overflowing_counts() {
        let seq = Sequence::new(vec![0, 1, 0, 1]).unwrap();
        let counts: Counts =
            serde_json::from_str(r#"{"00": 18446744073709551615, "01": 1}"#).unwrap();
        assert!(matches!(
            analyze_counts(&seq, &counts),
            Err(PaintshopError::CountsOverflow)
        ));

        // Total fits but the change-weighted sum does not.
        let mut counts = Counts::new();
        counts.insert("01", u64::MAX / 2 + 1);
        assert!(matches!(
            analyze_counts(&seq, &counts),
            Err(PaintshopError::CountsOverflow)
        ));
    }

    #[test]
    fn test_circuit_rejects_non_finite_angles() {
        let seq = Sequence::new(vec![0, 1, 0, 1]).unwrap();
        let model = IsingModel::from_sequence(&seq);
        assert!(matches!(
            qaoa_circuit(&model, QaoaParams::new(f64::NAN, 0.5), 1.0),
            Err(PaintshopError::NonFinite { name: "gamma", .. })
        ));
        assert!(matches!(
            qaoa_circuit(&model, QaoaParams::new(0.5, f64::INFINITY), 1.0),
            Err(PaintshopError::NonFinite { name: "beta", .. })
        ));
        assert!(matches!(
            qaoa_circuit(&model, QaoaParams::new(0.5, 0.5), f64::NEG_INFINITY),
            Err(PaintshopError::NonFinite { name: "coupling strength", .. })
        ));
    }

    #[test]
    fn test_params_from_slice() {
        assert_eq!(
            QaoaParams::from_slice(&[0.1, 0.2]).unwrap(),
            QaoaParams::new(0.1, 0.2)
        );
        assert!(QaoaParams::from_slice(&[0.1]).is_err());
    }
}
