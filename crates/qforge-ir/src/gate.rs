//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
///
/// Angles are in radians. Two-qubit gates take `[control, target]` operands
/// where the distinction applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Echoed cross-resonance gate (IBM Eagle native).
    ECR,
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),
    /// ZZ rotation gate.
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate, as used in basis gate lists.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::ECR => "ecr",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::ECR
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Get the numeric parameters of this gate.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p)
            | StandardGate::RZZ(p) => vec![p],
            StandardGate::U(theta, phi, lambda) => vec![theta, phi, lambda],
            _ => vec![],
        }
    }

    /// Whether applying this gate twice on the same operands is the identity.
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            StandardGate::I
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::CX
                | StandardGate::CY
                | StandardGate::CZ
                | StandardGate::CH
                | StandardGate::Swap
                | StandardGate::ECR
                | StandardGate::CCX
                | StandardGate::CSwap
        )
    }

    /// Whether the gate is invariant under exchanging its two operands.
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self,
            StandardGate::CZ | StandardGate::Swap | StandardGate::CP(_) | StandardGate::RZZ(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::U(0.1, 0.2, 0.3).num_qubits(), 1);
        assert_eq!(StandardGate::ECR.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
    }

    #[test]
    fn test_gate_params() {
        assert!(StandardGate::CX.params().is_empty());
        assert_eq!(StandardGate::Rz(0.5).params(), vec![0.5]);
        assert_eq!(StandardGate::U(1.0, 2.0, 3.0).params(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_self_inverse() {
        assert!(StandardGate::CX.is_self_inverse());
        assert!(StandardGate::ECR.is_self_inverse());
        assert!(!StandardGate::S.is_self_inverse());
        assert!(!StandardGate::Rz(0.1).is_self_inverse());
    }
}
