//! Hardware target description.
//!
//! A [`Target`] is everything the compiler needs to know about a device:
//! how many physical qubits it has, which gates it executes natively,
//! which qubit pairs can interact, and optionally how noisy each of those
//! resources currently is.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{CompileError, CompileResult};

/// Operations every target accepts without listing them in its basis.
pub const DIRECTIVES: &[&str] = &["measure", "reset", "barrier", "delay"];

/// Native gate set of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisGates {
    gates: Vec<String>,
}

impl BasisGates {
    /// Create a basis from gate names. Duplicates are dropped.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut seen = FxHashSet::default();
        let gates = gates
            .into_iter()
            .map(Into::into)
            .filter(|g: &String| seen.insert(g.clone()))
            .collect();
        Self { gates }
    }

    /// IBM Heron native gates.
    pub fn heron() -> Self {
        Self::new(["cz", "id", "rz", "sx", "x"])
    }

    /// IBM Eagle native gates.
    pub fn eagle() -> Self {
        Self::new(["ecr", "id", "rz", "sx", "x"])
    }

    /// Check whether a gate name is native.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }

    /// Check whether an operation is accepted, counting directives.
    pub fn accepts(&self, op: &str) -> bool {
        DIRECTIVES.contains(&op) || self.contains(op)
    }

    /// Gate names in declaration order.
    pub fn gates(&self) -> &[String] {
        &self.gates
    }
}

impl fmt::Display for BasisGates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.gates.join(", "))
    }
}

/// Target device coupling map.
///
/// Edges are undirected: a listed pair may host a two-qubit gate in either
/// orientation.
#[derive(Debug, Clone)]
pub struct CouplingMap {
    num_qubits: u32,
    edges: Vec<(u32, u32)>,
    adjacency: Vec<Vec<u32>>,
}

impl CouplingMap {
    /// Create a coupling map. Self loops are rejected; repeated and
    /// reversed pairs collapse into one edge.
    pub fn new(num_qubits: u32, pairs: impl IntoIterator<Item = (u32, u32)>) -> CompileResult<Self> {
        let mut adjacency = vec![Vec::new(); num_qubits as usize];
        let mut edges = Vec::new();
        for (a, b) in pairs {
            if a >= num_qubits || b >= num_qubits {
                return Err(CompileError::InvalidTarget(format!(
                    "edge ({a}, {b}) outside a {num_qubits}-qubit device"
                )));
            }
            if a == b {
                return Err(CompileError::InvalidTarget(format!("self loop on qubit {a}")));
            }
            if adjacency[a as usize].contains(&b) {
                continue;
            }
            adjacency[a as usize].push(b);
            adjacency[b as usize].push(a);
            edges.push((a.min(b), a.max(b)));
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }
        Ok(Self {
            num_qubits,
            edges,
            adjacency,
        })
    }

    /// Linear chain 0-1-2-...-(n-1).
    pub fn linear(n: u32) -> Self {
        Self::from_valid(n, (1..n).map(|i| (i - 1, i)))
    }

    /// Ring: a linear chain with the ends joined.
    pub fn ring(n: u32) -> Self {
        let closing = (n > 2).then(|| (n - 1, 0));
        Self::from_valid(n, (1..n).map(|i| (i - 1, i)).chain(closing))
    }

    /// Star with qubit 0 at the center.
    pub fn star(n: u32) -> Self {
        Self::from_valid(n, (1..n).map(|i| (0, i)))
    }

    /// All-to-all connectivity.
    pub fn full(n: u32) -> Self {
        Self::from_valid(n, (0..n).flat_map(|a| (a + 1..n).map(move |b| (a, b))))
    }

    fn from_valid(n: u32, pairs: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut adjacency = vec![Vec::new(); n as usize];
        let mut edges = Vec::new();
        for (a, b) in pairs {
            adjacency[a as usize].push(b);
            adjacency[b as usize].push(a);
            edges.push((a, b));
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }
        Self {
            num_qubits: n,
            edges,
            adjacency,
        }
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Undirected edges, each listed once with the smaller qubit first.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Neighbors of a physical qubit.
    pub fn neighbors(&self, qubit: u32) -> &[u32] {
        self.adjacency
            .get(qubit as usize)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Check if two qubits share an edge.
    pub fn is_connected(&self, a: u32, b: u32) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Shortest path between two qubits, both ends included.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        if from >= self.num_qubits || to >= self.num_qubits {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }
        let mut prev = vec![u32::MAX; self.num_qubits as usize];
        prev[from as usize] = from;
        let mut queue = VecDeque::from([from]);
        while let Some(node) = queue.pop_front() {
            for &next in self.neighbors(node) {
                if prev[next as usize] != u32::MAX {
                    continue;
                }
                prev[next as usize] = node;
                if next == to {
                    let mut path = vec![to];
                    let mut cur = to;
                    while cur != from {
                        cur = prev[cur as usize];
                        path.push(cur);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }
}

/// Per-resource error rates reported by the device.
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    readout_error: FxHashMap<u32, f64>,
    two_qubit_error: FxHashMap<(u32, u32), f64>,
}

impl Calibration {
    /// Create an empty calibration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the readout error of a qubit.
    pub fn set_readout_error(&mut self, qubit: u32, error: f64) {
        self.readout_error.insert(qubit, error);
    }

    /// Record the two-qubit gate error of an edge. Orientation is ignored;
    /// the lower of two reported directions wins.
    pub fn set_two_qubit_error(&mut self, a: u32, b: u32, error: f64) {
        let entry = self
            .two_qubit_error
            .entry((a.min(b), a.max(b)))
            .or_insert(error);
        *entry = entry.min(error);
    }

    /// Readout error of a qubit, if reported.
    pub fn readout_error(&self, qubit: u32) -> Option<f64> {
        self.readout_error.get(&qubit).copied()
    }

    /// Two-qubit gate error on an edge, if reported.
    pub fn two_qubit_error(&self, a: u32, b: u32) -> Option<f64> {
        self.two_qubit_error.get(&(a.min(b), a.max(b))).copied()
    }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.readout_error.is_empty() && self.two_qubit_error.is_empty()
    }
}

/// A compilation target.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    basis_gates: BasisGates,
    coupling_map: CouplingMap,
    calibration: Option<Calibration>,
}

impl Target {
    /// Create a target. The device size is the coupling map's qubit count.
    pub fn new(
        name: impl Into<String>,
        basis_gates: BasisGates,
        coupling_map: CouplingMap,
    ) -> CompileResult<Self> {
        let name = name.into();
        if basis_gates.gates().is_empty() {
            return Err(CompileError::InvalidTarget(format!(
                "target '{name}' declares no basis gates"
            )));
        }
        Ok(Self {
            name,
            basis_gates,
            coupling_map,
            calibration: None,
        })
    }

    /// Attach calibration data. Empty calibrations are discarded.
    #[must_use]
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = (!calibration.is_empty()).then_some(calibration);
        self
    }

    /// Backend name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> u32 {
        self.coupling_map.num_qubits()
    }

    /// Native gates.
    pub fn basis_gates(&self) -> &BasisGates {
        &self.basis_gates
    }

    /// Connectivity.
    pub fn coupling_map(&self) -> &CouplingMap {
        &self.coupling_map
    }

    /// Calibration data, if the device reported any.
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }
}
