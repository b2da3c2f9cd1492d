//! Backend descriptions and their mapping onto compilation targets.

use serde::Deserialize;
use tracing::warn;

use qforge_compile::{BasisGates, Calibration, CouplingMap, Target};

use crate::error::{IbmError, IbmResult};

/// Backend configuration from `/v1/backends/{name}/configuration`.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfiguration {
    /// Backend name.
    pub backend_name: String,
    /// Number of qubits.
    pub n_qubits: u32,
    /// Basis gates.
    #[serde(default)]
    pub basis_gates: Vec<String>,
    /// Directed coupling pairs. Absent on simulators with full connectivity.
    #[serde(default)]
    pub coupling_map: Option<Vec<[u32; 2]>>,
    /// Whether this is a simulator.
    #[serde(default)]
    pub simulator: bool,
}

/// Backend calibration from `/v1/backends/{name}/properties`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendProperties {
    /// Per-qubit measured quantities, indexed by qubit.
    #[serde(default)]
    pub qubits: Vec<Vec<Nduv>>,
    /// Per-gate measured quantities.
    #[serde(default)]
    pub gates: Vec<GateProperties>,
}

/// A named, dated measurement ("name, date, unit, value").
#[derive(Debug, Clone, Deserialize)]
pub struct Nduv {
    /// Quantity name, e.g. `readout_error`.
    pub name: String,
    /// Measured value.
    pub value: f64,
    /// Unit, empty for ratios.
    #[serde(default)]
    pub unit: String,
}

/// Calibration of one gate on one qubit tuple.
#[derive(Debug, Clone, Deserialize)]
pub struct GateProperties {
    /// Gate name.
    pub gate: String,
    /// Qubits the gate acts on.
    pub qubits: Vec<u32>,
    /// Measured quantities, e.g. `gate_error`.
    #[serde(default)]
    pub parameters: Vec<Nduv>,
}

fn find<'a>(values: &'a [Nduv], name: &str) -> Option<&'a Nduv> {
    values.iter().find(|v| v.name == name)
}

impl BackendProperties {
    /// Extract readout and two-qubit gate errors. Values outside [0, 1]
    /// are treated as unreported.
    pub fn calibration(&self) -> Calibration {
        let mut calibration = Calibration::new();
        for (qubit, values) in (0_u32..).zip(&self.qubits) {
            if let Some(readout) = find(values, "readout_error").filter(|v| is_rate(v.value)) {
                calibration.set_readout_error(qubit, readout.value);
            }
        }
        for gate in &self.gates {
            let &[a, b] = gate.qubits.as_slice() else {
                continue;
            };
            if let Some(error) = find(&gate.parameters, "gate_error").filter(|v| is_rate(v.value)) {
                calibration.set_two_qubit_error(a, b, error.value);
            }
        }
        calibration
    }
}

fn is_rate(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Build a compilation target from a backend description.
///
/// A missing coupling map means all-to-all connectivity.
pub fn build_target(
    name: &str,
    config: &BackendConfiguration,
    properties: Option<&BackendProperties>,
) -> IbmResult<Target> {
    let invalid = |source| IbmError::InvalidTarget {
        backend: name.to_string(),
        source,
    };

    let coupling_map = match &config.coupling_map {
        Some(pairs) => CouplingMap::new(config.n_qubits, pairs.iter().map(|&[a, b]| (a, b)))
            .map_err(invalid)?,
        None => CouplingMap::full(config.n_qubits),
    };
    let basis_gates = BasisGates::new(config.basis_gates.iter().cloned());
    let mut target = Target::new(name, basis_gates, coupling_map).map_err(invalid)?;

    if let Some(properties) = properties {
        let calibration = properties.calibration();
        if calibration.is_empty() {
            warn!(backend = name, "Backend properties carry no usable error rates");
        }
        target = target.with_calibration(calibration);
    }
    Ok(target)
}
