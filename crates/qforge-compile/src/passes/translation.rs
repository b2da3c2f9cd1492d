//! Basis translation.

use tracing::debug;

use qforge_ir::{Circuit, Instruction, InstructionKind, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::synthesis::{Entangler, OneQubitBasis, decompose_to_cx};
use crate::target::BasisGates;
use crate::unitary::Unitary2x2;

/// Rewrites every gate outside the target basis into native gates.
///
/// Native gates are left as they are. Single-qubit gates are
/// re-synthesized from their matrix; multi-qubit gates go through CX,
/// which is then lowered into the target's entangler.
pub struct BasisTranslation;

struct Translator<'a> {
    basis: &'a BasisGates,
    one_qubit: Option<OneQubitBasis>,
    entangler: Option<Entangler>,
}

impl Translator<'_> {
    fn not_in_basis(&self, name: &str) -> CompileError {
        CompileError::GateNotInBasis {
            gate: name.to_string(),
            basis: self.basis.to_string(),
        }
    }

    fn lower(&self, inst: Instruction, out: &mut Vec<Instruction>) -> CompileResult<()> {
        let InstructionKind::Gate(gate) = inst.kind else {
            out.push(inst);
            return Ok(());
        };
        if self.basis.contains(gate.name()) {
            out.push(inst);
            return Ok(());
        }

        if let Some(matrix) = Unitary2x2::from_gate(&gate) {
            let basis = self.one_qubit.ok_or_else(|| self.not_in_basis(gate.name()))?;
            out.extend(basis.synthesize(&matrix, inst.qubits[0]));
            return Ok(());
        }

        let parts = match (gate, inst.qubits.as_slice()) {
            (StandardGate::CX, &[control, target]) => self
                .entangler
                .ok_or_else(|| self.not_in_basis(gate.name()))?
                .lower_cx(control, target),
            _ => decompose_to_cx(&gate, &inst.qubits)
                .ok_or_else(|| self.not_in_basis(gate.name()))?,
        };
        for part in parts {
            self.lower(part, out)?;
        }
        Ok(())
    }
}

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "basis_translation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties.require_basis_gates()?;
        let translator = Translator {
            basis,
            one_qubit: OneQubitBasis::for_basis(basis),
            entangler: Entangler::for_basis(basis),
        };

        let before = circuit.num_ops();
        let mut out = Vec::with_capacity(before * 2);
        for inst in circuit.instructions() {
            translator.lower(inst.clone(), &mut out)?;
        }
        debug!("Translated {before} operations into {} native operations", out.len());

        let width = circuit.num_qubits();
        super::rebuild(circuit, width, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::CouplingMap;
    use qforge_ir::QubitId;

    fn translate(circuit: &mut Circuit, basis: BasisGates) -> CompileResult<()> {
        let mut props = PropertySet::new().with_target(CouplingMap::full(3), basis);
        BasisTranslation.run(circuit, &mut props)
    }

    fn all_native(circuit: &Circuit, basis: &BasisGates) -> bool {
        circuit.instructions().iter().all(|i| basis.accepts(i.name()))
    }

    #[test]
    fn test_bell_to_heron() {
        let mut circuit = Circuit::bell().unwrap();
        translate(&mut circuit, BasisGates::heron()).unwrap();
        assert!(all_native(&circuit, &BasisGates::heron()));
        assert_eq!(circuit.num_two_qubit_gates(), 1);
        assert_eq!(circuit.count_ops().iter().find(|(n, _)| *n == "cz").unwrap().1, 1);
    }

    #[test]
    fn test_swap_to_eagle() {
        let mut circuit = Circuit::with_size("s", 2, 0);
        circuit.swap(QubitId(0), QubitId(1)).unwrap();
        translate(&mut circuit, BasisGates::eagle()).unwrap();
        assert!(all_native(&circuit, &BasisGates::eagle()));
        assert_eq!(circuit.num_two_qubit_gates(), 3);
    }

    #[test]
    fn test_native_gates_untouched() {
        let mut circuit = Circuit::with_size("n", 2, 0);
        circuit.rz(0.3, QubitId(0)).unwrap();
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        let before = circuit.clone();
        translate(&mut circuit, BasisGates::heron()).unwrap();
        assert_eq!(circuit, before);
    }

    #[test]
    fn test_missing_entangler() {
        let mut circuit = Circuit::with_size("e", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let err = translate(&mut circuit, BasisGates::new(["rz", "sx"])).unwrap_err();
        assert!(matches!(err, CompileError::GateNotInBasis { ref gate, .. } if gate == "cx"));
    }

    #[test]
    fn test_u_basis() {
        let basis = BasisGates::new(["u", "cx"]);
        let mut circuit = Circuit::with_size("u", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        translate(&mut circuit, basis.clone()).unwrap();
        assert!(all_native(&circuit, &basis));
    }
}
