//! Circuit command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use paintshop_core::{QaoaParams, QaoaRunner, emit_qasm3};

use super::common::load_sequence;

/// Execute the circuit command.
pub fn execute(
    sequence: &str,
    gamma: f64,
    beta: f64,
    coupling: f64,
    output: Option<&Path>,
) -> Result<()> {
    let sequence = load_sequence(sequence)?;
    let runner = QaoaRunner::new(sequence).with_coupling_strength(coupling);
    let circuit = runner.circuit(QaoaParams::new(gamma, beta))?;
    let qasm = emit_qasm3(&circuit);

    match output {
        Some(path) => {
            fs::write(path, &qasm)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            println!(
                "{} Wrote {} ({} qubits, depth {}, {} two-qubit gates)",
                style("✓").green().bold(),
                style(path.display()).cyan(),
                circuit.num_qubits(),
                circuit.depth(),
                circuit.two_qubit_gate_count()
            );
        }
        None => print!("{qasm}"),
    }

    Ok(())
}
