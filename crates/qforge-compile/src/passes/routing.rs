//! SWAP-based routing.

use tracing::debug;

use qforge_ir::{Circuit, Instruction, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Basic routing: walks the circuit in order and, whenever a two-qubit
/// gate lands on an uncoupled pair, moves its first operand along a
/// shortest path with SWAPs until the pair is adjacent.
///
/// Runs on a circuit that already addresses physical qubits. The circuit's
/// final layout is updated to reflect every inserted SWAP.
pub struct BasicRouting;

impl Pass for BasicRouting {
    fn name(&self) -> &'static str {
        "basic_routing"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties.require_coupling_map()?;
        let n = circuit.num_qubits();

        // position[w]: physical qubit currently holding the state that
        // started on wire w. occupant is its inverse.
        let mut position: Vec<u32> = (0..n).collect();
        let mut occupant: Vec<u32> = (0..n).collect();
        let mut out = Vec::with_capacity(circuit.instructions().len());
        let mut swaps = 0;

        for inst in circuit.instructions() {
            if inst.is_gate() && inst.qubits.len() > 2 {
                return Err(CompileError::PassFailed {
                    name: self.name().into(),
                    reason: format!("'{}' acts on more than two qubits", inst.name()),
                });
            }
            if inst.is_gate() && inst.qubits.len() == 2 {
                let a = position[inst.qubits[0].0 as usize];
                let b = position[inst.qubits[1].0 as usize];
                if !coupling_map.is_connected(a, b) {
                    let path = coupling_map
                        .shortest_path(a, b)
                        .ok_or(CompileError::RoutingFailed { qubit1: a, qubit2: b })?;
                    for step in path.windows(2).take(path.len().saturating_sub(2)) {
                        let (p, q) = (step[0], step[1]);
                        out.push(Instruction::two_qubit_gate(
                            StandardGate::Swap,
                            QubitId(p),
                            QubitId(q),
                        ));
                        let (wp, wq) = (occupant[p as usize], occupant[q as usize]);
                        position[wp as usize] = q;
                        position[wq as usize] = p;
                        occupant.swap(p as usize, q as usize);
                        swaps += 1;
                    }
                }
            }
            out.push(inst.map_qubits(|q| QubitId(position[q.0 as usize])));
        }

        debug!("Inserted {swaps} SWAP gates");
        let final_layout = circuit
            .final_layout()
            .map(|initial| initial.iter().map(|&p| position[p as usize]).collect::<Vec<u32>>());
        super::rebuild(circuit, n, out)?;
        if let Some(layout) = final_layout {
            circuit.set_final_layout(layout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{BasisGates, CouplingMap};

    fn linear_props(n: u32) -> PropertySet {
        PropertySet::new().with_target(CouplingMap::linear(n), BasisGates::heron())
    }

    #[test]
    fn test_adjacent_gate_needs_no_swap() {
        let mut circuit = Circuit::with_size("c", 3, 0);
        circuit.cx(QubitId(1), QubitId(2)).unwrap();
        BasicRouting.run(&mut circuit, &mut linear_props(3)).unwrap();
        assert_eq!(circuit.num_ops(), 1);
    }

    #[test]
    fn test_distant_gate_gets_swaps() {
        let mut circuit = Circuit::with_size("c", 4, 0);
        circuit.set_final_layout(vec![0, 1, 2, 3]);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        BasicRouting.run(&mut circuit, &mut linear_props(4)).unwrap();

        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["swap", "swap", "cx", "h"]);
        // the state of wire 0 now sits on qubit 2, next to qubit 3
        assert_eq!(circuit.instructions()[2].qubits, vec![QubitId(2), QubitId(3)]);
        assert_eq!(circuit.instructions()[3].qubits, vec![QubitId(2)]);
        assert_eq!(circuit.final_layout(), Some(&[2, 0, 1, 3][..]));
    }

    #[test]
    fn test_disconnected_device_fails() {
        let mut props = PropertySet::new().with_target(
            CouplingMap::new(4, [(0, 1), (2, 3)]).unwrap(),
            BasisGates::heron(),
        );
        let mut circuit = Circuit::with_size("c", 4, 0);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();
        let err = BasicRouting.run(&mut circuit, &mut props).unwrap_err();
        assert!(matches!(
            err,
            CompileError::RoutingFailed {
                qubit1: 0,
                qubit2: 3
            }
        ));
    }
}
