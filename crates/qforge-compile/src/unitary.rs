//! 2x2 unitary matrices for single-qubit gate fusion.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4, PI};
use std::ops::Mul;

use num_complex::Complex64;
use qforge_ir::StandardGate;

/// Numerical tolerance for angle and matrix comparisons.
pub const EPSILON: f64 = 1e-9;

/// A 2x2 complex matrix, row major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// Matrix entries `[[a, b], [c, d]]`.
    pub data: [[Complex64; 2]; 2],
}

/// Euler angles of the U(θ, φ, λ) form of a single-qubit unitary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub theta: f64,
    pub phi: f64,
    pub lambda: f64,
}

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn phase(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

impl Unitary2x2 {
    /// Create a matrix from its entries.
    pub fn new(a: Complex64, b: Complex64, cc: Complex64, d: Complex64) -> Self {
        Self {
            data: [[a, b], [cc, d]],
        }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::new(c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0))
    }

    fn diag(d0: Complex64, d1: Complex64) -> Self {
        Self::new(d0, c(0.0, 0.0), c(0.0, 0.0), d1)
    }

    /// Matrix of a single-qubit standard gate, or `None` for multi-qubit gates.
    pub fn from_gate(gate: &StandardGate) -> Option<Self> {
        let zero = c(0.0, 0.0);
        let one = c(1.0, 0.0);
        let m = match *gate {
            StandardGate::I => Self::identity(),
            StandardGate::X => Self::new(zero, one, one, zero),
            StandardGate::Y => Self::new(zero, c(0.0, -1.0), c(0.0, 1.0), zero),
            StandardGate::Z => Self::diag(one, -one),
            StandardGate::H => {
                let h = c(FRAC_1_SQRT_2, 0.0);
                Self::new(h, h, h, -h)
            }
            StandardGate::S => Self::diag(one, c(0.0, 1.0)),
            StandardGate::Sdg => Self::diag(one, c(0.0, -1.0)),
            StandardGate::T => Self::diag(one, phase(FRAC_PI_4)),
            StandardGate::Tdg => Self::diag(one, phase(-FRAC_PI_4)),
            StandardGate::SX => Self::new(c(0.5, 0.5), c(0.5, -0.5), c(0.5, -0.5), c(0.5, 0.5)),
            StandardGate::SXdg => {
                Self::new(c(0.5, -0.5), c(0.5, 0.5), c(0.5, 0.5), c(0.5, -0.5))
            }
            StandardGate::Rx(theta) => {
                let (s, co) = (theta / 2.0).sin_cos();
                Self::new(c(co, 0.0), c(0.0, -s), c(0.0, -s), c(co, 0.0))
            }
            StandardGate::Ry(theta) => {
                let (s, co) = (theta / 2.0).sin_cos();
                Self::new(c(co, 0.0), c(-s, 0.0), c(s, 0.0), c(co, 0.0))
            }
            StandardGate::Rz(theta) => Self::diag(phase(-theta / 2.0), phase(theta / 2.0)),
            StandardGate::P(lambda) => Self::diag(one, phase(lambda)),
            StandardGate::U(theta, phi, lambda) => Self::u(theta, phi, lambda),
            _ => return None,
        };
        Some(m)
    }

    /// Matrix of U(θ, φ, λ).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let (s, co) = (theta / 2.0).sin_cos();
        Self::new(
            c(co, 0.0),
            -phase(lambda) * s,
            phase(phi) * s,
            phase(phi + lambda) * co,
        )
    }

    /// Euler angles such that this matrix equals U(θ, φ, λ) up to global phase.
    ///
    /// θ is returned in `[0, π]`; φ and λ are normalized to `(-π, π]`.
    pub fn euler_angles(&self) -> EulerAngles {
        let [[a, b], [cc, d]] = self.data;
        let theta = 2.0 * cc.norm().atan2(a.norm());
        let (phi, lambda) = if a.norm() > EPSILON {
            let alpha = a.arg();
            if cc.norm() > EPSILON {
                (cc.arg() - alpha, (-b).arg() - alpha)
            } else {
                (0.0, d.arg() - alpha)
            }
        } else {
            let alpha = (-b).arg();
            (cc.arg() - alpha, 0.0)
        };
        EulerAngles {
            theta,
            phi: normalize_angle(phi),
            lambda: normalize_angle(lambda),
        }
    }

    /// Check whether this matrix is the identity up to global phase.
    pub fn is_identity(&self) -> bool {
        let [[a, b], [cc, d]] = self.data;
        b.norm() < EPSILON && cc.norm() < EPSILON && (a - d).norm() < EPSILON
    }

    /// Check equality up to global phase.
    pub fn approx_eq_up_to_phase(&self, other: &Self) -> bool {
        let (mut pa, mut pb) = (c(0.0, 0.0), c(0.0, 0.0));
        for i in 0..2 {
            for j in 0..2 {
                if other.data[i][j].norm() > 1e-6 && pb.norm() == 0.0 {
                    pa = self.data[i][j];
                    pb = other.data[i][j];
                }
            }
        }
        if pb.norm() == 0.0 {
            return false;
        }
        let ratio = pa / pb;
        (0..2).all(|i| (0..2).all(|j| (self.data[i][j] - ratio * other.data[i][j]).norm() < 1e-8))
    }
}

impl Mul for Unitary2x2 {
    type Output = Self;

    /// Matrix product. `later * earlier` applies `earlier` first.
    fn mul(self, rhs: Self) -> Self {
        let a = self.data;
        let b = rhs.data;
        let mut out = [[c(0.0, 0.0); 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
            }
        }
        Self { data: out }
    }
}

/// Normalize an angle into `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle.rem_euclid(2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Whether an angle is zero modulo 2π.
pub fn is_zero_angle(angle: f64) -> bool {
    normalize_angle(angle).abs() < EPSILON
}

/// Whether two angles agree modulo 2π.
pub fn angles_close(a: f64, b: f64) -> bool {
    is_zero_angle(a - b)
}
