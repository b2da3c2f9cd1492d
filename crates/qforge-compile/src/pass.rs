//! Pass trait and types for compilation passes.

use qforge_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the circuit.
    Analysis,
    /// Transformation pass that rewrites the circuit.
    Transformation,
}

/// A compilation pass over one circuit.
///
/// Analysis passes may write to the `PropertySet` but leave the circuit
/// alone. Transformation passes rewrite the circuit and may read the
/// `PropertySet`.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given circuit.
    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        true
    }
}
