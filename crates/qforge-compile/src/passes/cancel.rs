//! Cancellation of adjacent inverse gates.

use tracing::debug;

use qforge_ir::{Circuit, Instruction};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::synthesis::is_inverse_pair;

/// Removes pairs of gates that multiply to the identity when nothing
/// touches their qubits in between.
///
/// Each wire keeps a stack of the operations still alive on it, so a
/// cancellation exposes the gate underneath for the next one:
/// `H X X H` disappears in a single run. Barriers, measurements and resets
/// sit on the stacks too and block cancellation across them.
pub struct CancelInverses;

fn same_operands(a: &Instruction, b: &Instruction, symmetric: bool) -> bool {
    a.qubits == b.qubits
        || (symmetric && a.qubits.len() == 2 && a.qubits[0] == b.qubits[1] && a.qubits[1] == b.qubits[0])
}

impl Pass for CancelInverses {
    fn name(&self) -> &'static str {
        "cancel_inverses"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
        let instructions = circuit.instructions();
        let mut alive = vec![true; instructions.len()];
        let mut wires: Vec<Vec<usize>> = vec![Vec::new(); circuit.num_qubits() as usize];
        let mut removed = 0;

        for (index, inst) in instructions.iter().enumerate() {
            let candidate = inst.as_gate().and_then(|gate| {
                let first = *wires[inst.qubits.first()?.0 as usize].last()?;
                let all_top = inst
                    .qubits
                    .iter()
                    .all(|q| wires[q.0 as usize].last() == Some(&first));
                let prev = &instructions[first];
                let prev_gate = prev.as_gate()?;
                let symmetric = gate.is_symmetric() && prev_gate.is_symmetric();
                (all_top
                    && prev.qubits.len() == inst.qubits.len()
                    && same_operands(prev, inst, symmetric)
                    && is_inverse_pair(prev_gate, gate))
                .then_some(first)
            });

            if let Some(first) = candidate {
                for q in &inst.qubits {
                    wires[q.0 as usize].pop();
                }
                alive[first] = false;
                alive[index] = false;
                removed += 2;
            } else {
                for q in &inst.qubits {
                    wires[q.0 as usize].push(index);
                }
            }
        }

        if removed == 0 {
            return Ok(());
        }
        debug!("Cancelled {removed} gates");

        let out: Vec<Instruction> = instructions
            .iter()
            .zip(alive)
            .filter_map(|(inst, keep)| keep.then(|| inst.clone()))
            .collect();
        let width = circuit.num_qubits();
        super::rebuild(circuit, width, out)
    }
}
