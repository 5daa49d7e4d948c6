//! 2x2 unitary matrices for the re-keying single-qubit gates.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A 2x2 complex matrix acting on one qubit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Pauli-Y.
    pub fn y() -> Self {
        Self::new(ZERO, Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0), ZERO)
    }

    /// Hadamard.
    pub fn h() -> Self {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Self::new(s, s, s, -s)
    }

    /// U2(φ, λ) = U3(π/2, φ, λ).
    pub fn u2(phi: f64, lambda: f64) -> Self {
        Self::new(
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            -Complex64::from_polar(FRAC_1_SQRT_2, lambda),
            Complex64::from_polar(FRAC_1_SQRT_2, phi),
            Complex64::from_polar(FRAC_1_SQRT_2, phi + lambda),
        )
    }

    /// U3(θ, φ, λ).
    pub fn u3(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// The image of basis state `|bit⟩`: `(⟨0|U|bit⟩, ⟨1|U|bit⟩)`.
    #[inline]
    pub fn column(&self, bit: bool) -> (Complex64, Complex64) {
        let [a, b, c, d] = self.data;
        if bit { (b, d) } else { (a, c) }
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a.conj(), c.conj(), b.conj(), d.conj())
    }

    /// Matrix product `self * other`.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Check `U†U = I` within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let product = self.adjoint().mul(self);
        let [a, b, c, d] = product.data;
        (a - ONE).norm() < tolerance
            && b.norm() < tolerance
            && c.norm() < tolerance
            && (d - ONE).norm() < tolerance
    }
}
