//! The built-in single-qubit gate set.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

/// A single-qubit gate. Controls are supplied separately at application time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// S = P(π/2).
    S,
    /// S† = P(-π/2).
    Sd,
    /// T = P(π/4).
    T,
    /// T† = P(-π/4).
    Td,
    /// Phase gate P(λ).
    P(f64),
    /// X rotation, applied as U3(θ, -π/2, π/2).
    Rx(f64),
    /// Y rotation, applied as U3(θ, 0, 0).
    Ry(f64),
    /// Z rotation diag(e^{-iλ/2}, e^{iλ/2}).
    Rz(f64),
    /// U2(φ, λ).
    U2(f64, f64),
    /// U3(θ, φ, λ).
    U3(f64, f64, f64),
}

impl Gate {
    /// Resolve an upper-case gate mnemonic and its angle arguments.
    ///
    /// Returns `None` when the name is unknown or `args` has the wrong length.
    pub fn from_name(name: &str, args: &[f64]) -> Option<Self> {
        let gate = match (name, args) {
            ("X", []) => Gate::X,
            ("Y", []) => Gate::Y,
            ("Z", []) => Gate::Z,
            ("H", []) => Gate::H,
            ("S", []) => Gate::S,
            ("SD", []) => Gate::Sd,
            ("T", []) => Gate::T,
            ("TD", []) => Gate::Td,
            ("P", &[lambda]) => Gate::P(lambda),
            ("RX", &[theta]) => Gate::Rx(theta),
            ("RY", &[theta]) => Gate::Ry(theta),
            ("RZ", &[lambda]) => Gate::Rz(lambda),
            ("U2", &[phi, lambda]) => Gate::U2(phi, lambda),
            ("U3", &[theta, phi, lambda]) => Gate::U3(theta, phi, lambda),
            _ => return None,
        };
        Some(gate)
    }

    /// Number of angle arguments a named gate takes, or `None` if unknown.
    pub fn arity(name: &str) -> Option<usize> {
        match name {
            "X" | "Y" | "Z" | "H" | "S" | "SD" | "T" | "TD" => Some(0),
            "P" | "RX" | "RY" | "RZ" => Some(1),
            "U2" => Some(2),
            "U3" => Some(3),
            _ => None,
        }
    }

    /// The gate mnemonic.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::X => "X",
            Gate::Y => "Y",
            Gate::Z => "Z",
            Gate::H => "H",
            Gate::S => "S",
            Gate::Sd => "SD",
            Gate::T => "T",
            Gate::Td => "TD",
            Gate::P(_) => "P",
            Gate::Rx(_) => "RX",
            Gate::Ry(_) => "RY",
            Gate::Rz(_) => "RZ",
            Gate::U2(..) => "U2",
            Gate::U3(..) => "U3",
        }
    }

    /// The inverse gate.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        match *self {
            Gate::X => Gate::X,
            Gate::Y => Gate::Y,
            Gate::Z => Gate::Z,
            Gate::H => Gate::H,
            Gate::S => Gate::Sd,
            Gate::Sd => Gate::S,
            Gate::T => Gate::Td,
            Gate::Td => Gate::T,
            Gate::P(lambda) => Gate::P(-lambda),
            Gate::Rx(theta) => Gate::Rx(-theta),
            Gate::Ry(theta) => Gate::Ry(-theta),
            Gate::Rz(lambda) => Gate::Rz(-lambda),
            Gate::U2(phi, lambda) => Gate::U3(-FRAC_PI_2, -lambda, -phi),
            Gate::U3(theta, phi, lambda) => Gate::U3(-theta, -lambda, -phi),
        }
    }

    /// The angle arguments, in declaration order.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            Gate::P(a) | Gate::Rx(a) | Gate::Ry(a) | Gate::Rz(a) => vec![a],
            Gate::U2(a, b) => vec![a, b],
            Gate::U3(a, b, c) => vec![a, b, c],
            _ => vec![],
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        let params = self.params();
        if !params.is_empty() {
            let params: Vec<String> = params.iter().map(ToString::to_string).collect();
            write!(f, "({})", params.join(", "))?;
        }
        Ok(())
    }
}

/// Phase applied by `T`.
pub(crate) const T_PHASE: f64 = PI / 4.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Gate::from_name("H", &[]), Some(Gate::H));
        assert_eq!(Gate::from_name("RZ", &[0.5]), Some(Gate::Rz(0.5)));
        assert_eq!(
            Gate::from_name("U3", &[0.1, 0.2, 0.3]),
            Some(Gate::U3(0.1, 0.2, 0.3))
        );
        assert_eq!(Gate::from_name("RZ", &[]), None);
        assert_eq!(Gate::from_name("CCX", &[]), None);
    }

    #[test]
    fn test_arity_matches_from_name() {
        for name in ["X", "Y", "Z", "H", "S", "SD", "T", "TD", "P", "RX", "RY", "RZ", "U2", "U3"] {
            let arity = Gate::arity(name).unwrap();
            let args = vec![0.25; arity];
            let gate = Gate::from_name(name, &args).unwrap();
            assert_eq!(gate.name(), name);
            assert_eq!(gate.params().len(), arity);
        }
        assert_eq!(Gate::arity("FOO"), None);
    }

    #[test]
    fn test_adjoint_pairs() {
        assert_eq!(Gate::S.adjoint(), Gate::Sd);
        assert_eq!(Gate::Td.adjoint(), Gate::T);
        assert_eq!(Gate::Rz(0.3).adjoint(), Gate::Rz(-0.3));
        assert_eq!(Gate::H.adjoint().adjoint(), Gate::H);
    }

    #[test]
    fn test_display() {
        assert_eq!(Gate::H.to_string(), "H");
        assert_eq!(Gate::U2(1.0, 2.0).to_string(), "U2(1, 2)");
    }
}
