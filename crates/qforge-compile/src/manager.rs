//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qforge_ir::{Circuit, CircuitBatch};

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::property::PropertySet;

/// Manages and executes a sequence of compilation passes.
///
/// A manager owns the property set it was configured with. Each circuit it
/// compiles starts from a fresh copy of those properties, so circuits in a
/// batch never see each other's layout decisions.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
    /// Properties every run starts from.
    properties: PropertySet,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self {
            passes: vec![],
            properties: PropertySet::new(),
        }
    }

    /// Set the properties every run starts from.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Names of the configured passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Properties every run starts from.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Run all passes on a circuit with caller-supplied properties.
    #[instrument(skip_all, fields(circuit = circuit.name()))]
    pub fn run_with(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        debug!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), circuit.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        debug!(
            "Pass manager completed, final depth: {}, ops: {}",
            circuit.depth(),
            circuit.num_ops()
        );

        Ok(())
    }

    /// Compile one circuit.
    pub fn run(&self, mut circuit: Circuit) -> CompileResult<Circuit> {
        let mut properties = self.properties.clone();
        self.run_with(&mut circuit, &mut properties)?;
        Ok(circuit)
    }

    /// Compile every circuit of a batch. Output order matches input order.
    ///
    /// The first failing circuit aborts the batch; the error names its index.
    #[instrument(skip_all, fields(circuits = batch.len()))]
    pub fn run_batch(&self, batch: CircuitBatch) -> CompileResult<CircuitBatch> {
        let compiled = batch
            .into_iter()
            .enumerate()
            .map(|(index, circuit)| {
                let name = circuit.name().to_string();
                self.run(circuit).map_err(|e| CompileError::Circuit {
                    index,
                    name,
                    source: Box::new(e),
                })
            })
            .collect::<CompileResult<CircuitBatch>>()?;

        info!(
            circuits = compiled.len(),
            two_qubit_gates = compiled.iter().map(Circuit::num_two_qubit_gates).sum::<usize>(),
            "Batch compiled"
        );
        Ok(compiled)
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::PassKind;
    use qforge_ir::QubitId;

    /// Appends an X on qubit 0, or fails when asked to.
    struct AppendX {
        fail_on: Option<&'static str>,
    }

    impl Pass for AppendX {
        fn name(&self) -> &str {
            "append_x"
        }

        fn kind(&self) -> PassKind {
            PassKind::Transformation
        }

        fn run(&self, circuit: &mut Circuit, _: &mut PropertySet) -> CompileResult<()> {
            if self.fail_on == Some(circuit.name()) {
                return Err(CompileError::PassFailed {
                    name: "append_x".into(),
                    reason: "requested".into(),
                });
            }
            circuit.x(QubitId(0))?;
            Ok(())
        }
    }

    #[test]
    fn test_passes_run_in_order() {
        let mut pm = PassManager::new();
        pm.add_pass(AppendX { fail_on: None });
        pm.add_pass(AppendX { fail_on: None });
        let out = pm.run(Circuit::with_size("c", 1, 0)).unwrap();
        assert_eq!(out.num_ops(), 2);
        assert_eq!(pm.pass_names(), vec!["append_x", "append_x"]);
    }

    #[test]
    fn test_batch_preserves_order() {
        let mut pm = PassManager::new();
        pm.add_pass(AppendX { fail_on: None });
        let batch: CircuitBatch = ["a", "b", "c"]
            .into_iter()
            .map(|n| Circuit::with_size(n, 1, 0))
            .collect();
        let out = pm.run_batch(batch).unwrap();
        let names: Vec<_> = out.iter().map(Circuit::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_batch_error_names_circuit() {
        let mut pm = PassManager::new();
        pm.add_pass(AppendX { fail_on: Some("b") });
        let batch: CircuitBatch = ["a", "b"]
            .into_iter()
            .map(|n| Circuit::with_size(n, 1, 0))
            .collect();
        let err = pm.run_batch(batch).unwrap_err();
        assert!(matches!(err, CompileError::Circuit { index: 1, .. }));
        assert_eq!(err.to_string(), "Failed to compile circuit 1 ('b')");
    }
}
