//! OpenQASM 3 emitter.
//!
//! External samplers take circuits as text; this keeps the hand-off format
//! independent of any particular vendor SDK. `rzz` is not part of
//! `stdgates.inc`, so circuits that use it carry an inline definition.

use crate::circuit::{Circuit, Gate, Instruction};

const RZZ_DEFINITION: &str = "gate rzz(theta) a, b { cx a, b; rz(theta) b; cx a, b; }";

/// Emit a circuit as OpenQASM 3 source.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::default();
    emitter.emit_circuit(circuit);
    emitter.output
}

#[derive(Default)]
struct Emitter {
    output: String,
}

impl Emitter {
    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        let uses_rzz = circuit.instructions().iter().any(|i| {
            matches!(
                i,
                Instruction::Gate {
                    gate: Gate::Rzz(_),
                    ..
                }
            )
        });
        if uses_rzz {
            self.writeln(RZZ_DEFINITION);
        }
        self.writeln("");

        let num_qubits = circuit.num_qubits();
        if num_qubits > 0 {
            self.writeln(&format!("qubit[{num_qubits}] q;"));
        }
        let num_clbits = circuit.num_clbits();
        if num_clbits > 0 {
            self.writeln(&format!("bit[{num_clbits}] c;"));
        }
        if num_qubits > 0 || num_clbits > 0 {
            self.writeln("");
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction);
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Gate { gate, qubits } => {
                let operands: Vec<String> = qubits.iter().map(|q| format!("q[{}]", q.0)).collect();
                let operands = operands.join(", ");
                match gate.angle() {
                    Some(theta) => {
                        self.writeln(&format!("{}({theta}) {operands};", gate.name()));
                    }
                    None => self.writeln(&format!("{} {operands};", gate.name())),
                }
            }
            Instruction::Measure { qubit, clbit } => {
                self.writeln(&format!("c[{}] = measure q[{}];", clbit.0, qubit.0));
            }
        }
    }
}
