//! Layout selection and application.

use tracing::debug;

use qforge_ir::{Circuit, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{Layout, PropertySet};
use crate::target::{Calibration, CouplingMap};

/// Error rate assumed for resources the calibration does not mention.
const UNKNOWN_ERROR: f64 = 1.0;

fn check_fits(circuit: &Circuit, coupling_map: &CouplingMap) -> CompileResult<()> {
    if circuit.num_qubits() > coupling_map.num_qubits() {
        return Err(CompileError::CircuitTooLarge {
            required: circuit.num_qubits(),
            available: coupling_map.num_qubits(),
        });
    }
    Ok(())
}

/// Trivial layout: virtual qubit i goes to physical qubit i.
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "trivial_layout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        check_fits(circuit, properties.require_coupling_map()?)?;
        properties.layout = Some(Layout::trivial(circuit.num_qubits()));
        Ok(())
    }
}

/// Calibration-aware layout.
///
/// Grows a connected region of the device from every possible seed qubit,
/// each step adding the neighbor with the lowest readout plus link error,
/// and keeps the region with the lowest total error. Virtual qubits with
/// the most two-qubit interactions are placed first, in the order the
/// region was grown. Without calibration data, or when no connected region
/// is large enough, it falls back to the trivial layout.
pub struct NoiseAwareLayout;

impl NoiseAwareLayout {
    fn grow_region(
        seed: u32,
        size: usize,
        coupling_map: &CouplingMap,
        calibration: &Calibration,
    ) -> Option<(Vec<u32>, f64)> {
        let readout = |q: u32| calibration.readout_error(q).unwrap_or(UNKNOWN_ERROR);
        let mut in_region = vec![false; coupling_map.num_qubits() as usize];
        let mut region = vec![seed];
        in_region[seed as usize] = true;
        let mut score = readout(seed);

        while region.len() < size {
            let mut best: Option<(u32, f64)> = None;
            for &member in &region {
                for &next in coupling_map.neighbors(member) {
                    if in_region[next as usize] {
                        continue;
                    }
                    let link = calibration
                        .two_qubit_error(member, next)
                        .unwrap_or(UNKNOWN_ERROR);
                    let cost = readout(next) + link;
                    if best.is_none_or(|(q, c)| cost < c || (cost == c && next < q)) {
                        best = Some((next, cost));
                    }
                }
            }
            let (next, cost) = best?;
            in_region[next as usize] = true;
            region.push(next);
            score += cost;
        }
        Some((region, score))
    }
}

impl Pass for NoiseAwareLayout {
    fn name(&self) -> &'static str {
        "noise_aware_layout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties.require_coupling_map()?;
        check_fits(circuit, coupling_map)?;

        let n = circuit.num_qubits() as usize;
        let Some(calibration) = properties.calibration.as_ref().filter(|_| n > 0) else {
            properties.layout = Some(Layout::trivial(circuit.num_qubits()));
            return Ok(());
        };

        let mut best: Option<(Vec<u32>, f64)> = None;
        for seed in 0..coupling_map.num_qubits() {
            if let Some((region, score)) = Self::grow_region(seed, n, coupling_map, calibration) {
                if best.as_ref().is_none_or(|(_, s)| score < *s) {
                    best = Some((region, score));
                }
            }
        }
        let Some((region, score)) = best else {
            debug!("No connected region of {n} qubits, using trivial layout");
            properties.layout = Some(Layout::trivial(circuit.num_qubits()));
            return Ok(());
        };

        let mut degree = vec![0usize; n];
        for inst in circuit.instructions() {
            if inst.is_gate() && inst.qubits.len() == 2 {
                for q in &inst.qubits {
                    degree[q.0 as usize] += 1;
                }
            }
        }
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&v| std::cmp::Reverse(degree[v]));

        let mut physical = vec![0u32; n];
        for (slot, &v) in order.iter().enumerate() {
            physical[v] = region[slot];
        }
        debug!(?physical, score, "Selected noise-aware layout");
        properties.layout = Some(Layout::from_physical(physical, coupling_map.num_qubits())?);
        Ok(())
    }
}

/// Rewrites the circuit onto physical qubits using the chosen layout.
///
/// The result is as wide as the device. Its final layout starts out equal
/// to the initial layout; routing updates it as SWAPs move qubits.
pub struct ApplyLayout;

impl Pass for ApplyLayout {
    fn name(&self) -> &'static str {
        "apply_layout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let width = properties.require_coupling_map()?.num_qubits();
        let layout = properties.require_layout()?;
        if layout.len() != circuit.num_qubits() as usize {
            return Err(CompileError::InvalidConfiguration(format!(
                "layout covers {} qubits but circuit has {}",
                layout.len(),
                circuit.num_qubits()
            )));
        }

        let mapped: Vec<_> = circuit
            .instructions()
            .iter()
            .map(|inst| inst.map_qubits(|q| QubitId(layout.as_slice()[q.0 as usize])))
            .collect();
        let initial = layout.as_slice().to_vec();
        super::rebuild(circuit, width, mapped)?;
        circuit.set_final_layout(initial);
        Ok(())
    }
}
