//! qforge circuit intermediate representation.
//!
//! This crate defines the circuit model shared by the compiler and the
//! transpiler service, together with the binary batch format circuits travel
//! in between services.
//!
//! # Example
//!
//! ```rust
//! use qforge_ir::{Circuit, CircuitBatch, QubitId, ClbitId};
//!
//! let mut bell = Circuit::with_size("bell", 2, 2);
//! bell.h(QubitId(0)).unwrap();
//! bell.cx(QubitId(0), QubitId(1)).unwrap();
//! bell.measure(QubitId(0), ClbitId(0)).unwrap();
//! bell.measure(QubitId(1), ClbitId(1)).unwrap();
//!
//! let batch = CircuitBatch::from(vec![bell]);
//! let encoded = batch.to_base64().unwrap();
//! let decoded = CircuitBatch::from_base64(&encoded).unwrap();
//! assert_eq!(decoded.len(), 1);
//! ```

pub mod batch;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use batch::{CircuitBatch, FORMAT_VERSION, MAGIC};
pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
