//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while building circuits or moving batches across the wire.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit.
    #[error("Qubit {qubit} not found in circuit with {num_qubits} qubits")]
    QubitNotFound {
        /// The offending qubit.
        qubit: QubitId,
        /// Width of the circuit.
        num_qubits: u32,
    },

    /// Classical bit index outside the circuit.
    #[error("Classical bit {clbit} not found in circuit with {num_clbits} bits")]
    ClbitNotFound {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Number of classical bits in the circuit.
        num_clbits: u32,
    },

    /// Gate applied to the wrong number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {0} in operation")]
    DuplicateQubit(QubitId),

    /// Measurement qubit and clbit lists differ in length.
    #[error("Measurement has {qubits} qubits but {clbits} classical bits")]
    MeasureArity {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of target classical bits.
        clbits: usize,
    },

    /// Final layout names a physical qubit outside the circuit.
    #[error("Final layout refers to qubits outside a {num_qubits}-qubit circuit")]
    InvalidLayout {
        /// Width of the circuit.
        num_qubits: u32,
    },

    /// Payload does not start with the batch magic bytes.
    #[error("Not a qforge circuit batch (bad magic bytes)")]
    BadMagic,

    /// Payload was written by an unknown format version.
    #[error("Unsupported batch format version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version byte found in the payload.
        found: u8,
        /// Version this build reads and writes.
        supported: u8,
    },

    /// Payload ended before the header was complete.
    #[error("Circuit batch is truncated ({0} bytes)")]
    Truncated(usize),

    /// Payload is not valid base64.
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Batch body could not be decoded.
    #[error("Failed to decode circuit batch: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// Batch body could not be encoded.
    #[error("Failed to encode circuit batch: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
