//! `PropertySet` and related types for pass communication.
//!
//! Passes share data through a [`PropertySet`]: the target description is
//! loaded into it before the first pass runs, and the layout pass leaves
//! its decision there for the passes that map qubits afterwards.

use crate::error::{CompileError, CompileResult};
use crate::target::{BasisGates, Calibration, CouplingMap, Target};

/// A mapping from virtual qubits to physical qubits.
///
/// Entry `i` is the physical qubit holding virtual qubit `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    physical: Vec<u32>,
}

impl Layout {
    /// Create a trivial layout (virtual qubit i -> physical qubit i).
    pub fn trivial(num_qubits: u32) -> Self {
        Self {
            physical: (0..num_qubits).collect(),
        }
    }

    /// Create a layout from an explicit assignment.
    ///
    /// Fails if a physical qubit is used twice or lies outside the device.
    pub fn from_physical(physical: Vec<u32>, num_physical: u32) -> CompileResult<Self> {
        let mut used = vec![false; num_physical as usize];
        for &p in &physical {
            let slot = used.get_mut(p as usize).ok_or_else(|| {
                CompileError::InvalidConfiguration(format!(
                    "layout uses qubit {p} on a {num_physical}-qubit device"
                ))
            })?;
            if *slot {
                return Err(CompileError::InvalidConfiguration(format!(
                    "layout maps two virtual qubits to physical qubit {p}"
                )));
            }
            *slot = true;
        }
        Ok(Self { physical })
    }

    /// Get the physical qubit for a virtual qubit.
    pub fn physical(&self, virtual_qubit: u32) -> Option<u32> {
        self.physical.get(virtual_qubit as usize).copied()
    }

    /// Get the number of mapped qubits.
    pub fn len(&self) -> usize {
        self.physical.len()
    }

    /// Check if the layout is empty.
    pub fn is_empty(&self) -> bool {
        self.physical.is_empty()
    }

    /// Physical qubits indexed by virtual qubit.
    pub fn as_slice(&self) -> &[u32] {
        &self.physical
    }
}

/// Properties shared between passes.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    /// Target coupling map.
    pub coupling_map: Option<CouplingMap>,
    /// Target native gates.
    pub basis_gates: Option<BasisGates>,
    /// Target error rates.
    pub calibration: Option<Calibration>,
    /// Chosen initial layout.
    pub layout: Option<Layout>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load everything a target describes.
    pub fn from_target(target: &Target) -> Self {
        Self {
            coupling_map: Some(target.coupling_map().clone()),
            basis_gates: Some(target.basis_gates().clone()),
            calibration: target.calibration().cloned(),
            layout: None,
        }
    }

    /// Set the coupling map and basis gates.
    #[must_use]
    pub fn with_target(mut self, coupling_map: CouplingMap, basis_gates: BasisGates) -> Self {
        self.coupling_map = Some(coupling_map);
        self.basis_gates = Some(basis_gates);
        self
    }

    pub(crate) fn require_coupling_map(&self) -> CompileResult<&CouplingMap> {
        self.coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)
    }

    pub(crate) fn require_basis_gates(&self) -> CompileResult<&BasisGates> {
        self.basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)
    }

    pub(crate) fn require_layout(&self) -> CompileResult<&Layout> {
        self.layout.as_ref().ok_or(CompileError::MissingLayout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rejects_duplicates() {
        assert!(Layout::from_physical(vec![0, 2, 0], 3).is_err());
        assert!(Layout::from_physical(vec![3], 3).is_err());
        let layout = Layout::from_physical(vec![2, 0], 3).unwrap();
        assert_eq!(layout.physical(0), Some(2));
        assert_eq!(layout.physical(2), None);
    }

    #[test]
    fn test_from_target() {
        let target =
            Target::new("dev", BasisGates::eagle(), CouplingMap::linear(3)).unwrap();
        let props = PropertySet::from_target(&target);
        assert!(props.basis_gates.unwrap().contains("ecr"));
        assert_eq!(props.coupling_map.unwrap().num_qubits(), 3);
        assert!(props.layout.is_none());
    }
}
