//! High-level circuit builder API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Instructions are kept in program order. Every instruction is validated
/// against the circuit's width when it is applied, so a `Circuit` never
/// references a qubit or classical bit it does not own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
    /// Free-form user metadata, carried through compilation untouched.
    #[serde(default)]
    metadata: Option<serde_json::Value>,
    /// Physical qubit holding each virtual qubit at the end of the circuit.
    /// Set by the compiler; `None` for logical circuits.
    #[serde(default)]
    final_layout: Option<Vec<u32>>,
}

impl Circuit {
    /// Create a new empty circuit with no qubits.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, 0, 0)
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
            metadata: None,
            final_layout: None,
        }
    }

    /// Create an empty circuit with the same name, classical bits and
    /// metadata as this one, but `num_qubits` wide.
    pub fn empty_like(&self, num_qubits: u32) -> Self {
        Self {
            name: self.name.clone(),
            num_qubits,
            num_clbits: self.num_clbits,
            instructions: Vec::with_capacity(self.instructions.len()),
            metadata: self.metadata.clone(),
            final_layout: self.final_layout.clone(),
        }
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        id
    }

    /// Attach user metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Re-check every instruction against the circuit's width.
    ///
    /// Circuits built through [`Circuit::apply`] are always valid; this is
    /// for circuits that arrive deserialized.
    pub fn check(&self) -> IrResult<()> {
        if let Some(layout) = &self.final_layout {
            if layout.iter().any(|&p| p >= self.num_qubits) {
                return Err(IrError::InvalidLayout {
                    num_qubits: self.num_qubits,
                });
            }
        }
        self.instructions.iter().try_for_each(|inst| self.validate(inst))
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit(qubit));
            }
        }
        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    num_clbits: self.num_clbits,
                });
            }
        }
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
                if got != gate.num_qubits() {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected: gate.num_qubits(),
                        got,
                    });
                }
            }
            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(IrError::MeasureArity {
                        qubits: instruction.qubits.len(),
                        clbits: instruction.clbits.len(),
                    });
                }
            }
            InstructionKind::Reset | InstructionKind::Barrier | InstructionKind::Delay { .. } => {}
        }
        Ok(())
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply a standard gate to the given qubits.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::S, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::T, [qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::SX, [qubit])
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rx(theta), [qubit])
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Ry(theta), [qubit])
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta), [qubit])
    }

    /// Apply universal single-qubit gate U(θ, φ, λ).
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::U(theta, phi, lambda), [qubit])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Apply controlled-Z gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, [q1, q2])
    }

    /// Apply ZZ rotation.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::RZZ(theta), [q1, q2])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CCX, [c1, c2, target])
    }

    // =========================================================================
    // Directives
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit into the classical bit of the same index,
    /// adding classical bits if needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.num_clbits < self.num_qubits {
            self.add_clbit();
        }
        for i in 0..self.num_qubits {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::reset(qubit))
    }

    /// Add a barrier on the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Add a delay on a qubit.
    pub fn delay(&mut self, qubit: QubitId, duration: u64) -> IrResult<&mut Self> {
        self.apply(Instruction::delay(qubit, duration))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Get the instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consume the circuit, returning its instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Get the user metadata.
    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    /// Get the final layout recorded by the compiler.
    pub fn final_layout(&self) -> Option<&[u32]> {
        self.final_layout.as_deref()
    }

    /// Record the physical qubit holding each virtual qubit.
    pub fn set_final_layout(&mut self, layout: Vec<u32>) {
        self.final_layout = Some(layout);
    }

    /// Number of operations, excluding barriers.
    pub fn num_ops(&self) -> usize {
        self.instructions.iter().filter(|i| !i.is_barrier()).count()
    }

    /// Number of two-qubit gates.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.is_gate() && i.qubits.len() == 2)
            .count()
    }

    /// Operation counts keyed by name, sorted by name.
    pub fn count_ops(&self) -> Vec<(&'static str, usize)> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Circuit depth: the longest chain of operations on any wire.
    ///
    /// Barriers synchronise their qubits without adding a layer.
    pub fn depth(&self) -> usize {
        // Sized by the highest wire referenced, not the declared width.
        let qubits = self
            .instructions
            .iter()
            .flat_map(|inst| &inst.qubits)
            .map(|q| q.0 as usize + 1)
            .max()
            .unwrap_or(0);
        let clbits = self
            .instructions
            .iter()
            .flat_map(|inst| &inst.clbits)
            .map(|c| c.0 as usize + 1)
            .max()
            .unwrap_or(0);
        let mut qubit_depth = vec![0usize; qubits];
        let mut clbit_depth = vec![0usize; clbits];

        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_depth[q.0 as usize])
                .chain(inst.clbits.iter().map(|c| clbit_depth[c.0 as usize]))
                .max()
                .unwrap_or(0);
            let end = if inst.is_barrier() { start } else { start + 1 };
            for q in &inst.qubits {
                qubit_depth[q.0 as usize] = end;
            }
            for c in &inst.clbits {
                clbit_depth[c.0 as usize] = end;
            }
        }

        qubit_depth
            .into_iter()
            .chain(clbit_depth)
            .max()
            .unwrap_or(0)
    }

    // =========================================================================
    // Common circuits
    // =========================================================================

    /// Create a Bell state circuit with measurements.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit.h(QubitId(0))?;
        circuit.cx(QubitId(0), QubitId(1))?;
        circuit.measure(QubitId(0), ClbitId(0))?;
        circuit.measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }

    /// Create an n-qubit GHZ state circuit with measurements.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size(format!("ghz_{n}"), n, n);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(0), QubitId(i))?;
        }
        for i in 0..n {
            circuit.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(circuit)
    }
}
