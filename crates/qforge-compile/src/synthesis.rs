//! Gate decomposition rules.
//!
//! Single-qubit unitaries are re-synthesized from their Euler angles into
//! whichever rotation family the target offers. Multi-qubit gates are
//! rewritten into CX plus single-qubit gates, and CX itself into the
//! target's native entangler. All identities hold up to global phase.

use std::f64::consts::{FRAC_PI_2, PI};

use qforge_ir::{Instruction, QubitId, StandardGate};

use crate::target::BasisGates;
use crate::unitary::{EPSILON, Unitary2x2, is_zero_angle, normalize_angle};

/// Family of single-qubit rotations a target can express every unitary in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneQubitBasis {
    /// RZ and SX, with X used for π rotations when `with_x` is set.
    ZSX {
        /// Whether X is native.
        with_x: bool,
    },
    /// The U(θ, φ, λ) gate.
    U,
    /// RZ and RY.
    ZYZ,
}

impl OneQubitBasis {
    /// Pick the rotation family a basis supports, preferring RZ/SX.
    pub fn for_basis(basis: &BasisGates) -> Option<Self> {
        if basis.contains("rz") && basis.contains("sx") {
            Some(Self::ZSX {
                with_x: basis.contains("x"),
            })
        } else if basis.contains("u") {
            Some(Self::U)
        } else if basis.contains("rz") && basis.contains("ry") {
            Some(Self::ZYZ)
        } else {
            None
        }
    }

    /// Synthesize a unitary on `qubit`. Identity yields no gates.
    pub fn synthesize(self, unitary: &Unitary2x2, qubit: QubitId) -> Vec<Instruction> {
        if unitary.is_identity() {
            return vec![];
        }
        let e = unitary.euler_angles();
        let (theta, phi, lambda) = (e.theta, e.phi, e.lambda);
        let mut out = Vec::with_capacity(5);
        let mut push = |gate: StandardGate| match gate {
            StandardGate::Rz(a) | StandardGate::Ry(a) if is_zero_angle(a) => {}
            StandardGate::Rz(a) => out.push(Instruction::single_qubit_gate(
                StandardGate::Rz(normalize_angle(a)),
                qubit,
            )),
            other => out.push(Instruction::single_qubit_gate(other, qubit)),
        };

        match self {
            Self::U => push(StandardGate::U(theta, phi, lambda)),
            Self::ZYZ => {
                push(StandardGate::Rz(lambda));
                push(StandardGate::Ry(theta));
                push(StandardGate::Rz(phi));
            }
            Self::ZSX { with_x } => {
                if theta.abs() < EPSILON {
                    push(StandardGate::Rz(phi + lambda));
                } else if (theta - FRAC_PI_2).abs() < EPSILON {
                    push(StandardGate::Rz(lambda - FRAC_PI_2));
                    push(StandardGate::SX);
                    push(StandardGate::Rz(phi + FRAC_PI_2));
                } else if with_x && (theta - PI).abs() < EPSILON {
                    push(StandardGate::Rz(lambda));
                    push(StandardGate::X);
                    push(StandardGate::Rz(phi + PI));
                } else {
                    push(StandardGate::Rz(lambda));
                    push(StandardGate::SX);
                    push(StandardGate::Rz(theta + PI));
                    push(StandardGate::SX);
                    push(StandardGate::Rz(phi + PI));
                }
            }
        }
        out
    }
}

/// Native two-qubit entangler CX is lowered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entangler {
    CX,
    CZ,
    ECR,
}

impl Entangler {
    /// Pick the entangler of a basis, preferring CX, then CZ, then ECR.
    pub fn for_basis(basis: &BasisGates) -> Option<Self> {
        [Self::CX, Self::CZ, Self::ECR]
            .into_iter()
            .find(|e| basis.contains(e.gate().name()))
    }

    /// The gate this entangler stands for.
    pub fn gate(self) -> StandardGate {
        match self {
            Self::CX => StandardGate::CX,
            Self::CZ => StandardGate::CZ,
            Self::ECR => StandardGate::ECR,
        }
    }

    /// CX(control, target) expressed with this entangler.
    pub fn lower_cx(self, control: QubitId, target: QubitId) -> Vec<Instruction> {
        let one = Instruction::single_qubit_gate;
        let two = Instruction::two_qubit_gate;
        match self {
            Self::CX => vec![two(StandardGate::CX, control, target)],
            Self::CZ => vec![
                one(StandardGate::H, target),
                two(StandardGate::CZ, control, target),
                one(StandardGate::H, target),
            ],
            Self::ECR => vec![
                one(StandardGate::Rz(-FRAC_PI_2), control),
                one(StandardGate::SX, target),
                two(StandardGate::ECR, control, target),
                one(StandardGate::X, control),
                one(StandardGate::X, target),
            ],
        }
    }
}

/// Rewrite a multi-qubit gate other than CX into CX and single-qubit gates.
///
/// Returns `None` for single-qubit gates and for CX itself.
pub fn decompose_to_cx(gate: &StandardGate, qubits: &[QubitId]) -> Option<Vec<Instruction>> {
    let one = Instruction::single_qubit_gate;
    let cx = |c, t| Instruction::two_qubit_gate(StandardGate::CX, c, t);

    let out = match (*gate, qubits) {
        (StandardGate::CY, &[c, t]) => vec![one(StandardGate::Sdg, t), cx(c, t), one(StandardGate::S, t)],
        (StandardGate::CZ, &[c, t]) => vec![one(StandardGate::H, t), cx(c, t), one(StandardGate::H, t)],
        (StandardGate::CH, &[c, t]) => vec![
            one(StandardGate::S, t),
            one(StandardGate::H, t),
            one(StandardGate::T, t),
            cx(c, t),
            one(StandardGate::Tdg, t),
            one(StandardGate::H, t),
            one(StandardGate::Sdg, t),
        ],
        (StandardGate::Swap, &[a, b]) => vec![cx(a, b), cx(b, a), cx(a, b)],
        (StandardGate::ECR, &[a, b]) => vec![
            one(StandardGate::Rz(FRAC_PI_2), a),
            one(StandardGate::SX, b),
            cx(a, b),
            one(StandardGate::X, a),
        ],
        (StandardGate::CRz(theta), &[c, t]) => vec![
            one(StandardGate::Rz(theta / 2.0), t),
            cx(c, t),
            one(StandardGate::Rz(-theta / 2.0), t),
            cx(c, t),
        ],
        (StandardGate::CP(lambda), &[c, t]) => vec![
            one(StandardGate::P(lambda / 2.0), c),
            cx(c, t),
            one(StandardGate::P(-lambda / 2.0), t),
            cx(c, t),
            one(StandardGate::P(lambda / 2.0), t),
        ],
        (StandardGate::RZZ(theta), &[a, b]) => {
            vec![cx(a, b), one(StandardGate::Rz(theta), b), cx(a, b)]
        }
        (StandardGate::CCX, &[a, b, t]) => ccx(a, b, t),
        (StandardGate::CSwap, &[c, a, b]) => {
            let mut out = vec![cx(b, a)];
            out.extend(ccx(c, a, b));
            out.push(cx(b, a));
            out
        }
        _ => return None,
    };
    Some(out)
}

/// Toffoli in the standard six-CX form.
fn ccx(a: QubitId, b: QubitId, t: QubitId) -> Vec<Instruction> {
    let one = Instruction::single_qubit_gate;
    let cx = |c, t| Instruction::two_qubit_gate(StandardGate::CX, c, t);
    vec![
        one(StandardGate::H, t),
        cx(b, t),
        one(StandardGate::Tdg, t),
        cx(a, t),
        one(StandardGate::T, t),
        cx(b, t),
        one(StandardGate::Tdg, t),
        cx(a, t),
        one(StandardGate::T, b),
        one(StandardGate::T, t),
        one(StandardGate::H, t),
        cx(a, b),
        one(StandardGate::T, a),
        one(StandardGate::Tdg, b),
        cx(a, b),
    ]
}

/// Whether two gates on identical operands multiply to the identity.
pub fn is_inverse_pair(first: &StandardGate, second: &StandardGate) -> bool {
    use StandardGate as G;

    if first.is_self_inverse() && first == second {
        return true;
    }
    match (*first, *second) {
        (G::S, G::Sdg) | (G::Sdg, G::S) | (G::T, G::Tdg) | (G::Tdg, G::T) => true,
        (G::SX, G::SXdg) | (G::SXdg, G::SX) => true,
        (G::Rx(a), G::Rx(b))
        | (G::Ry(a), G::Ry(b))
        | (G::Rz(a), G::Rz(b))
        | (G::P(a), G::P(b))
        | (G::CRz(a), G::CRz(b))
        | (G::CP(a), G::CP(b))
        | (G::RZZ(a), G::RZZ(b)) => is_zero_angle(a + b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn product(instructions: &[Instruction]) -> Unitary2x2 {
        instructions.iter().fold(Unitary2x2::identity(), |acc, inst| {
            Unitary2x2::from_gate(inst.as_gate().unwrap()).unwrap() * acc
        })
    }

    #[test]
    fn test_zsx_synthesis_matches_input() {
        let bases = [
            OneQubitBasis::ZSX { with_x: true },
            OneQubitBasis::ZSX { with_x: false },
            OneQubitBasis::U,
            OneQubitBasis::ZYZ,
        ];
        let inputs = [
            StandardGate::H,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::SX,
            StandardGate::T,
            StandardGate::Ry(0.4),
            StandardGate::U(1.3, 0.2, -2.9),
            StandardGate::Rx(3.0),
        ];
        for basis in bases {
            for gate in &inputs {
                let m = Unitary2x2::from_gate(gate).unwrap();
                let seq = basis.synthesize(&m, q(0));
                assert!(
                    product(&seq).approx_eq_up_to_phase(&m),
                    "{basis:?} failed on {gate:?}"
                );
            }
        }
    }

    #[test]
    fn test_zsx_gate_counts() {
        let basis = OneQubitBasis::ZSX { with_x: true };
        let h = Unitary2x2::from_gate(&StandardGate::H).unwrap();
        assert_eq!(basis.synthesize(&h, q(0)).len(), 3);
        let x = Unitary2x2::from_gate(&StandardGate::X).unwrap();
        let seq = basis.synthesize(&x, q(0));
        assert_eq!(seq.len(), 1);
        assert_eq!(seq[0].name(), "x");
        let rz = Unitary2x2::from_gate(&StandardGate::Rz(0.25)).unwrap();
        assert_eq!(basis.synthesize(&rz, q(0)).len(), 1);
        assert!(basis.synthesize(&Unitary2x2::identity(), q(0)).is_empty());
    }

    #[test]
    fn test_for_basis() {
        assert_eq!(
            OneQubitBasis::for_basis(&BasisGates::heron()),
            Some(OneQubitBasis::ZSX { with_x: true })
        );
        assert_eq!(
            OneQubitBasis::for_basis(&BasisGates::new(["u", "cx"])),
            Some(OneQubitBasis::U)
        );
        assert_eq!(OneQubitBasis::for_basis(&BasisGates::new(["cx"])), None);
        assert_eq!(Entangler::for_basis(&BasisGates::eagle()), Some(Entangler::ECR));
        assert_eq!(Entangler::for_basis(&BasisGates::heron()), Some(Entangler::CZ));
    }

    #[test]
    fn test_inverse_pairs() {
        assert!(is_inverse_pair(&StandardGate::CX, &StandardGate::CX));
        assert!(is_inverse_pair(&StandardGate::T, &StandardGate::Tdg));
        assert!(is_inverse_pair(&StandardGate::RZZ(0.3), &StandardGate::RZZ(-0.3)));
        assert!(!is_inverse_pair(&StandardGate::S, &StandardGate::S));
        assert!(!is_inverse_pair(&StandardGate::CX, &StandardGate::CZ));
    }

    #[test]
    fn test_decompose_arity() {
        assert!(decompose_to_cx(&StandardGate::CX, &[q(0), q(1)]).is_none());
        assert!(decompose_to_cx(&StandardGate::H, &[q(0)]).is_none());
        assert_eq!(
            decompose_to_cx(&StandardGate::CCX, &[q(0), q(1), q(2)])
                .unwrap()
                .iter()
                .filter(|i| i.name() == "cx")
                .count(),
            6
        );
        assert_eq!(decompose_to_cx(&StandardGate::Swap, &[q(0), q(1)]).unwrap().len(), 3);
    }
}
