//! Repeat a group of passes until the circuit stops shrinking.

use tracing::debug;

use qforge_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Default cap on loop iterations.
const DEFAULT_MAX_ITERATIONS: usize = 16;

/// Runs its inner passes repeatedly until a round leaves the circuit
/// unchanged, or `max_iterations` rounds have run.
///
/// The inner passes must never grow the circuit for the loop to converge.
pub struct FixedPoint {
    passes: Vec<Box<dyn Pass>>,
    max_iterations: usize,
}

impl FixedPoint {
    /// Create an empty loop.
    pub fn new() -> Self {
        Self {
            passes: vec![],
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Add a pass to the loop body.
    #[must_use]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Cap the number of rounds.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }
}

impl Default for FixedPoint {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for FixedPoint {
    fn name(&self) -> &'static str {
        "fixed_point"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        for round in 1..=self.max_iterations {
            let before = circuit.clone();
            for pass in &self.passes {
                if pass.should_run(circuit, properties) {
                    pass.run(circuit, properties)?;
                }
            }
            debug!(
                round,
                ops = circuit.num_ops(),
                depth = circuit.depth(),
                "Optimization round finished"
            );
            if *circuit == before {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{CancelInverses, Optimize1qGates};
    use crate::target::{BasisGates, CouplingMap};
    use qforge_ir::QubitId;

    #[test]
    fn test_loop_reaches_fixed_point() {
        // h cz h h cz h on a heron basis: one round of each pass is not
        // enough, the loop has to alternate fusion and cancellation
        let mut circuit = Circuit::with_size("c", 2, 0);
        circuit.h(QubitId(1)).unwrap();
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        circuit.h(QubitId(1)).unwrap();

        let mut props =
            PropertySet::new().with_target(CouplingMap::linear(2), BasisGates::heron());
        let pass = FixedPoint::new()
            .with_pass(Optimize1qGates)
            .with_pass(CancelInverses);
        pass.run(&mut circuit, &mut props).unwrap();
        assert_eq!(circuit.num_ops(), 0);
    }
}
