//! qforge compilation framework.
//!
//! This crate maps logical circuits onto hardware targets. It follows a
//! pass-based design: a [`PassManager`] runs an ordered list of [`Pass`]es
//! over each circuit, with a [`PropertySet`] carrying the target
//! description and the layout between them.
//!
//! # Overview
//!
//! 1. **Unroll**: rewrite gates on three or more qubits
//! 2. **Layout**: pick physical qubits for the virtual ones
//! 3. **Routing**: insert SWAP gates to satisfy connectivity constraints
//! 4. **Translation**: convert gates to the target's native gate set
//! 5. **Optimization**: fuse single-qubit runs and cancel inverse pairs
//! 6. **Verification**: check the result against the target
//!
//! # Example
//!
//! ```rust
//! use qforge_compile::{BasisGates, CouplingMap, Target, generate_preset_pass_manager};
//! use qforge_ir::Circuit;
//!
//! let target = Target::new("fake_heron", BasisGates::heron(), CouplingMap::linear(5)).unwrap();
//! let pm = generate_preset_pass_manager(3, &target).unwrap();
//!
//! let compiled = pm.run(Circuit::ghz(3).unwrap()).unwrap();
//! assert_eq!(compiled.num_qubits(), 5);
//! assert!(compiled
//!     .instructions()
//!     .iter()
//!     .all(|i| target.basis_gates().accepts(i.name())));
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod preset;
pub mod property;
pub mod synthesis;
pub mod target;
pub mod unitary;

pub use error::{CompileError, CompileResult};
pub use manager::PassManager;
pub use pass::{Pass, PassKind};
pub use preset::{MAX_OPTIMIZATION_LEVEL, generate_preset_pass_manager};
pub use property::{Layout, PropertySet};
pub use target::{BasisGates, Calibration, CouplingMap, Target};
