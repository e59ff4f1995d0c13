//! A small circuit representation for QAOA cost/mixer blocks.
//!
//! Only the gates a single-block Ising QAOA needs are modelled. Execution
//! and native-gate compilation belong to whatever [`crate::Sampler`]
//! consumes the circuit, usually through its OpenQASM 3 text
//! ([`crate::qasm::emit`]).

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{PaintshopError, PaintshopResult};

/// Identifier of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Identifier of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Gates used by the QAOA circuits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard gate.
    H,
    /// Rotation around X: `exp(-i θ/2 X)`.
    Rx(f64),
    /// ZZ rotation: `exp(-i θ/2 Z⊗Z)`.
    Rzz(f64),
}

impl Gate {
    /// OpenQASM name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H => "h",
            Gate::Rx(_) => "rx",
            Gate::Rzz(_) => "rzz",
        }
    }

    /// Number of qubits this gate acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            Gate::H | Gate::Rx(_) => 1,
            Gate::Rzz(_) => 2,
        }
    }

    /// Rotation angle, if parameterized.
    pub fn angle(&self) -> Option<f64> {
        match self {
            Gate::H => None,
            Gate::Rx(theta) | Gate::Rzz(theta) => Some(*theta),
        }
    }
}

/// One circuit instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// A unitary gate.
    Gate {
        /// The gate.
        gate: Gate,
        /// Operand qubits, in gate order.
        qubits: Vec<QubitId>,
    },
    /// Computational-basis measurement.
    Measure {
        /// Measured qubit.
        qubit: QubitId,
        /// Destination bit.
        clbit: ClbitId,
    },
}

impl Instruction {
    /// Qubits touched by this instruction.
    pub fn qubits(&self) -> &[QubitId] {
        match self {
            Instruction::Gate { qubits, .. } => qubits,
            Instruction::Measure { qubit, .. } => std::slice::from_ref(qubit),
        }
    }

    /// Name used in operation counts.
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Gate { gate, .. } => gate.name(),
            Instruction::Measure { .. } => "measure",
        }
    }
}

/// A linear list of instructions over a fixed qubit/bit register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit with the given register sizes.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: Vec::new(),
        }
    }

    fn check_qubit(&self, qubit: QubitId, gate: &str) -> PaintshopResult<()> {
        if qubit.0 < self.num_qubits {
            Ok(())
        } else {
            Err(PaintshopError::InvalidCircuit(format!(
                "{gate} on {qubit} but circuit has {} qubits",
                self.num_qubits
            )))
        }
    }

    fn push_gate(&mut self, gate: Gate, qubits: Vec<QubitId>) -> PaintshopResult<&mut Self> {
        for &q in &qubits {
            self.check_qubit(q, gate.name())?;
        }
        if qubits.len() == 2 && qubits[0] == qubits[1] {
            return Err(PaintshopError::InvalidCircuit(format!(
                "{} applied twice to {}",
                gate.name(),
                qubits[0]
            )));
        }
        self.instructions.push(Instruction::Gate { gate, qubits });
        Ok(self)
    }

    /// Apply a Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> PaintshopResult<&mut Self> {
        self.push_gate(Gate::H, vec![qubit])
    }

    /// Apply an X rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> PaintshopResult<&mut Self> {
        self.push_gate(Gate::Rx(theta), vec![qubit])
    }

    /// Apply a ZZ rotation.
    pub fn rzz(&mut self, theta: f64, q0: QubitId, q1: QubitId) -> PaintshopResult<&mut Self> {
        self.push_gate(Gate::Rzz(theta), vec![q0, q1])
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> PaintshopResult<&mut Self> {
        self.check_qubit(qubit, "measure")?;
        if clbit.0 >= self.num_clbits {
            return Err(PaintshopError::InvalidCircuit(format!(
                "measure into {clbit} but circuit has {} bits",
                self.num_clbits
            )));
        }
        self.instructions.push(Instruction::Measure { qubit, clbit });
        Ok(self)
    }

    /// Measure qubit `i` into bit `i` for every qubit, growing the bit register if needed.
    pub fn measure_all(&mut self) -> PaintshopResult<&mut Self> {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        for q in 0..self.num_qubits {
            self.measure(QubitId(q), ClbitId(q))?;
        }
        Ok(self)
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of layers when every instruction is scheduled as early as possible.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits as usize];
        for instruction in &self.instructions {
            let qubits = instruction.qubits();
            let next = qubits
                .iter()
                .map(|q| layer[q.0 as usize])
                .max()
                .unwrap_or(0)
                + 1;
            for q in qubits {
                layer[q.0 as usize] = next;
            }
        }
        layer.into_iter().max().unwrap_or(0)
    }

    /// Instruction counts by name.
    pub fn count_ops(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for instruction in &self.instructions {
            *counts.entry(instruction.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of two-qubit gates, the dominant cost on trapped-ion hardware.
    pub fn two_qubit_gate_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.qubits().len() == 2)
            .count()
    }
}
