//! Error types for the compilation crate.

use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qforge_ir::IrError),

    /// Missing coupling map for layout or routing.
    #[error("Missing coupling map for routing")]
    MissingCouplingMap,

    /// Routing or layout application ran before a layout was chosen.
    #[error("Missing layout for routing")]
    MissingLayout,

    /// Missing basis gates.
    #[error("Missing basis gates for translation")]
    MissingBasisGates,

    /// Target description is inconsistent.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Routing failed because qubits are not connected.
    #[error("Routing failed: qubits {qubit1} and {qubit2} not connected")]
    RoutingFailed { qubit1: u32, qubit2: u32 },

    /// Gate has no translation into the target basis.
    #[error("Gate '{gate}' cannot be expressed in target basis [{basis}]")]
    GateNotInBasis { gate: String, basis: String },

    /// A two-qubit gate acts on an uncoupled pair after compilation.
    #[error("Gate '{gate}' acts on uncoupled qubits {qubit1} and {qubit2}")]
    NotCoupled {
        gate: String,
        qubit1: u32,
        qubit2: u32,
    },

    /// Compiled circuit width differs from the device.
    #[error("Compiled circuit has {got} qubits but target has {expected}")]
    WidthMismatch { expected: u32, got: u32 },

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed { name: String, reason: String },

    /// Invalid pass configuration.
    #[error("Invalid pass configuration: {0}")]
    InvalidConfiguration(String),

    /// Circuit too large for target.
    #[error("Circuit requires {required} qubits but target only has {available}")]
    CircuitTooLarge { required: u32, available: u32 },

    /// One circuit of a batch failed to compile.
    #[error("Failed to compile circuit {index} ('{name}')")]
    Circuit {
        index: usize,
        name: String,
        #[source]
        source: Box<CompileError>,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
