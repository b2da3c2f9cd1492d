//! Built-in compilation passes.
//!
//! [`CheckWidth`] bounds the circuit by the device first. Target passes
//! map a logical circuit onto a device:
//! [`TrivialLayout`] or [`NoiseAwareLayout`], then [`ApplyLayout`],
//! [`BasicRouting`] and [`BasisTranslation`]. Optimization passes
//! ([`Optimize1qGates`], [`CancelInverses`], wrapped in a [`FixedPoint`]
//! loop at the highest level) shrink the result, and [`CheckIsa`] verifies
//! it.

mod cancel;
mod fixed_point;
mod layout;
mod optimize_1q;
mod routing;
mod translation;
mod unroll;
mod verify;

pub use cancel::CancelInverses;
pub use fixed_point::FixedPoint;
pub use layout::{ApplyLayout, NoiseAwareLayout, TrivialLayout};
pub use optimize_1q::Optimize1qGates;
pub use routing::BasicRouting;
pub use translation::BasisTranslation;
pub use unroll::Unroll3q;
pub use verify::{CheckIsa, CheckWidth};

use qforge_ir::{Circuit, Instruction};

use crate::error::CompileResult;

/// Replace a circuit's body, keeping its name, classical bits, metadata
/// and final layout.
pub(crate) fn rebuild(
    circuit: &mut Circuit,
    num_qubits: u32,
    instructions: impl IntoIterator<Item = Instruction>,
) -> CompileResult<()> {
    let mut out = circuit.empty_like(num_qubits);
    for inst in instructions {
        out.apply(inst)?;
    }
    *circuit = out;
    Ok(())
}
