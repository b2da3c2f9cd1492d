//! Single-qubit gate fusion.

use tracing::debug;

use qforge_ir::{Circuit, Instruction};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::synthesis::OneQubitBasis;
use crate::target::BasisGates;
use crate::unitary::Unitary2x2;

/// Merges every maximal run of single-qubit gates on a wire into one
/// unitary and re-synthesizes it in the target's rotation family.
///
/// A run is replaced only when the result is shorter, or when the run
/// contains gates the target does not support. Runs that multiply to the
/// identity disappear. The pass therefore never grows the circuit.
pub struct Optimize1qGates;

impl Optimize1qGates {
    fn resolve_basis(properties: &PropertySet) -> (OneQubitBasis, Option<&BasisGates>) {
        let basis = properties.basis_gates.as_ref();
        let family = basis
            .and_then(OneQubitBasis::for_basis)
            .unwrap_or(OneQubitBasis::U);
        (family, basis)
    }
}

impl Pass for Optimize1qGates {
    fn name(&self) -> &'static str {
        "optimize_1q_gates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let (family, basis) = Self::resolve_basis(properties);
        let instructions = circuit.instructions();

        // replacement[i]: what to emit in place of instruction i, if it
        // heads or belongs to a rewritten run.
        let mut replacement: Vec<Option<Vec<Instruction>>> = vec![None; instructions.len()];
        let mut runs: Vec<Vec<usize>> = vec![Vec::new(); circuit.num_qubits() as usize];
        let mut rewritten = 0;

        let mut flush = |run: &mut Vec<usize>, replacement: &mut Vec<Option<Vec<Instruction>>>| {
            if run.is_empty() {
                return;
            }
            let qubit = instructions[run[0]].qubits[0];
            let matrix = run.iter().fold(Unitary2x2::identity(), |acc, &i| {
                instructions[i]
                    .as_gate()
                    .and_then(Unitary2x2::from_gate)
                    .map_or(acc, |m| m * acc)
            });
            let synthesized = family.synthesize(&matrix, qubit);
            let unsupported = basis.is_some_and(|b| {
                run.iter().any(|&i| !b.contains(instructions[i].name()))
            });
            if synthesized.len() < run.len() || unsupported {
                for &i in &run[1..] {
                    replacement[i] = Some(vec![]);
                }
                replacement[run[0]] = Some(synthesized);
                rewritten += 1;
            }
            run.clear();
        };

        for (index, inst) in instructions.iter().enumerate() {
            let is_1q_gate = inst
                .as_gate()
                .is_some_and(|g| Unitary2x2::from_gate(g).is_some());
            if is_1q_gate {
                runs[inst.qubits[0].0 as usize].push(index);
            } else {
                for q in &inst.qubits {
                    flush(&mut runs[q.0 as usize], &mut replacement);
                }
            }
        }
        for run in &mut runs {
            flush(run, &mut replacement);
        }

        if rewritten == 0 {
            return Ok(());
        }
        debug!("Rewrote {rewritten} single-qubit runs");

        let out: Vec<Instruction> = instructions
            .iter()
            .zip(replacement)
            .flat_map(|(inst, rep)| rep.unwrap_or_else(|| vec![inst.clone()]))
            .collect();
        let width = circuit.num_qubits();
        super::rebuild(circuit, width, out)
    }
}
