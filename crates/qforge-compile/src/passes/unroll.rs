//! Unrolling of gates acting on three or more qubits.

use tracing::debug;

use qforge_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::synthesis::decompose_to_cx;

/// Rewrites every gate on three or more qubits into CX and single-qubit
/// gates, so that routing only has to deal with pairs.
pub struct Unroll3q;

impl Pass for Unroll3q {
    fn name(&self) -> &'static str {
        "unroll_3q"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit
            .instructions()
            .iter()
            .any(|i| i.is_gate() && i.qubits.len() > 2)
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut out = Vec::with_capacity(circuit.instructions().len());
        let mut unrolled = 0;
        for inst in circuit.instructions() {
            match inst.as_gate() {
                Some(gate) if inst.qubits.len() > 2 => {
                    let parts = decompose_to_cx(gate, &inst.qubits).ok_or_else(|| {
                        CompileError::PassFailed {
                            name: self.name().into(),
                            reason: format!("no decomposition for '{}'", gate.name()),
                        }
                    })?;
                    out.extend(parts);
                    unrolled += 1;
                }
                _ => out.push(inst.clone()),
            }
        }
        debug!("Unrolled {unrolled} multi-qubit gates");
        let width = circuit.num_qubits();
        super::rebuild(circuit, width, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qforge_ir::QubitId;

    #[test]
    fn test_unroll_toffoli() {
        let mut circuit = Circuit::with_size("t", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        circuit.barrier([QubitId(0), QubitId(1), QubitId(2)]).unwrap();

        let mut props = PropertySet::new();
        assert!(Unroll3q.should_run(&circuit, &props));
        Unroll3q.run(&mut circuit, &mut props).unwrap();

        assert!(
            circuit
                .instructions()
                .iter()
                .all(|i| i.is_barrier() || i.qubits.len() <= 2)
        );
        assert_eq!(circuit.num_two_qubit_gates(), 6);
        assert!(circuit.instructions().last().unwrap().is_barrier());
    }
}
