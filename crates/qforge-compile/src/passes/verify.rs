//! Verification that a compiled circuit only uses what the target offers.

use qforge_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Rejects circuits wider than the device.
///
/// Scheduled ahead of every pass that allocates per wire, so a circuit
/// declaring more qubits than the device ends in
/// [`CompileError::CircuitTooLarge`] instead of a huge allocation.
pub struct CheckWidth;

impl Pass for CheckWidth {
    fn name(&self) -> &'static str {
        "check_width"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let available = properties.require_coupling_map()?.num_qubits();
        if circuit.num_qubits() > available {
            return Err(CompileError::CircuitTooLarge {
                required: circuit.num_qubits(),
                available,
            });
        }
        Ok(())
    }
}

/// Checks the instruction-set invariants of a compiled circuit.
///
/// - every operation is a native gate or a directive,
/// - every two-qubit gate acts on a coupled pair,
/// - the circuit is exactly as wide as the device,
/// - a final layout has been recorded.
pub struct CheckIsa;

impl Pass for CheckIsa {
    fn name(&self) -> &'static str {
        "check_isa"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties.require_coupling_map()?;
        let basis = properties.require_basis_gates()?;

        if circuit.num_qubits() != coupling_map.num_qubits() {
            return Err(CompileError::WidthMismatch {
                expected: coupling_map.num_qubits(),
                got: circuit.num_qubits(),
            });
        }

        for inst in circuit.instructions() {
            if !basis.accepts(inst.name()) {
                return Err(CompileError::GateNotInBasis {
                    gate: inst.name().to_string(),
                    basis: basis.to_string(),
                });
            }
            if inst.is_gate() && inst.qubits.len() == 2 {
                let (a, b) = (inst.qubits[0].0, inst.qubits[1].0);
                if !coupling_map.is_connected(a, b) {
                    return Err(CompileError::NotCoupled {
                        gate: inst.name().to_string(),
                        qubit1: a,
                        qubit2: b,
                    });
                }
            }
        }

        if circuit.final_layout().is_none() {
            return Err(CompileError::MissingLayout);
        }
        Ok(())
    }
}
