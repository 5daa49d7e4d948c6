//! Property-based tests for the state-map gate algebra.
//!
//! Random gate sequences must preserve the norm, and undoing the sequence
//! with the adjoint gates in reverse order must restore the original state.

use num_complex::Complex64;
use proptest::prelude::*;
use sparq_state::{BitIndex, Gate, StateMap};

const NUM_QUBITS: usize = 4;

/// A gate applied to a target with optional controls.
#[derive(Debug, Clone)]
struct GateOp {
    gate: Gate,
    target: usize,
    ctrl: Vec<usize>,
}

fn arb_gate() -> impl Strategy<Value = Gate> {
    let fixed = prop::sample::select(vec![
        Gate::X,
        Gate::Y,
        Gate::Z,
        Gate::H,
        Gate::S,
        Gate::Sd,
        Gate::T,
        Gate::Td,
    ]);
    let angle = -6.3_f64..6.3;
    let rotation = prop_oneof![
        angle.clone().prop_map(Gate::P),
        angle.clone().prop_map(Gate::Rx),
        angle.clone().prop_map(Gate::Ry),
        angle.clone().prop_map(Gate::Rz),
        (angle.clone(), angle.clone()).prop_map(|(a, b)| Gate::U2(a, b)),
        (angle.clone(), angle.clone(), angle).prop_map(|(a, b, c)| Gate::U3(a, b, c)),
    ];
    prop_oneof![fixed, rotation]
}

fn arb_gate_op() -> impl Strategy<Value = GateOp> {
    (
        arb_gate(),
        0..NUM_QUBITS,
        prop::collection::vec(0..NUM_QUBITS, 0..=2),
    )
        .prop_map(|(gate, target, ctrl)| {
            let ctrl = ctrl.into_iter().filter(|&c| c != target).collect();
            GateOp { gate, target, ctrl }
        })
}

fn states_equal(a: &StateMap, b: &StateMap, tolerance: f64) -> bool {
    let keys: Vec<BitIndex> = a.iter().chain(b.iter()).map(|(k, _)| *k).collect();
    keys.iter().all(|k| {
        let x = a.get(k).unwrap_or_default();
        let y = b.get(k).unwrap_or_default();
        (x - y).norm() < tolerance
    })
}

proptest! {
    #[test]
    fn gates_preserve_norm(ops in prop::collection::vec(arb_gate_op(), 1..=12)) {
        let mut state = StateMap::new();
        for op in &ops {
            state.apply_gate(&op.gate, op.target, &op.ctrl);
            prop_assert!((state.norm_sqr() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn adjoint_sequence_restores_state(ops in prop::collection::vec(arb_gate_op(), 1..=10)) {
        let mut state = StateMap::new();
        state.h(0, &[]);
        let initial = state.clone();

        for op in &ops {
            state.apply_gate(&op.gate, op.target, &op.ctrl);
        }
        for op in ops.iter().rev() {
            state.apply_gate(&op.gate.adjoint(), op.target, &op.ctrl);
        }
        prop_assert!(states_equal(&state, &initial, 1e-8));
    }

    #[test]
    fn swap_is_an_involution(a in 0..NUM_QUBITS, b in 0..NUM_QUBITS, theta in -3.0_f64..3.0) {
        let mut state = StateMap::new();
        state.ry(theta, 0, &[]);
        state.cnot(0, 1, &[]);
        let initial = state.clone();
        state.swap(a, b);
        state.swap(a, b);
        prop_assert!(states_equal(&state, &initial, 1e-12));
    }

    #[test]
    fn tensor_multiplies_amplitudes(theta in -3.0_f64..3.0, phi in -3.0_f64..3.0) {
        let mut left = StateMap::new();
        left.ry(theta, 0, &[]);
        let mut right = StateMap::new();
        right.rx(phi, 1, &[]);

        let product = left.tensor(&right);
        prop_assert!((product.norm_sqr() - 1.0).abs() < 1e-9);
        for (l, amp_l) in left.iter() {
            for (r, amp_r) in right.iter() {
                let expected: Complex64 = amp_l * amp_r;
                let got = product.get(&(*l | *r)).unwrap_or_default();
                prop_assert!((expected - got).norm() < 1e-12);
            }
        }
    }
}
