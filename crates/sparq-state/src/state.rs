//! Sparse state map of one coherent subsystem.

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;

use crate::dump::{DumpEntry, DumpRecord, sort_amplitudes};
use crate::gate::{Gate, T_PHASE};
use crate::index::BitIndex;
use crate::unitary::Unitary2x2;

/// Magnitude below which an amplitude is treated as zero and pruned.
pub const EPSILON: f64 = 1e-10;

/// Basis state → amplitude.
pub type Amplitudes = FxHashMap<BitIndex, Complex64>;

/// Sparse amplitudes of one partition.
///
/// Only basis states with `|amp| >= EPSILON` are stored. Every gate takes the
/// list of control positions it is conditioned on; entries whose controls are
/// not all 1 pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMap {
    amplitudes: Amplitudes,
}

impl StateMap {
    /// The single-entry state |0…0⟩ with amplitude 1.
    pub fn new() -> Self {
        let mut amplitudes = Amplitudes::default();
        amplitudes.insert(BitIndex::zero(), Complex64::new(1.0, 0.0));
        Self { amplitudes }
    }

    /// Build a state map from raw amplitudes, pruning negligible entries.
    pub fn from_amplitudes(mut amplitudes: Amplitudes) -> Self {
        prune(&mut amplitudes);
        Self { amplitudes }
    }

    /// Number of stored basis states.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Returns `true` if no basis state is stored.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Amplitude of `index`, if stored.
    pub fn get(&self, index: &BitIndex) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Iterate over stored entries in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&BitIndex, &Complex64)> {
        self.amplitudes.iter()
    }

    /// Entries sorted by basis index.
    pub fn sorted_entries(&self) -> Vec<(BitIndex, Complex64)> {
        let mut entries: Vec<_> = self.amplitudes.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// The raw map.
    pub fn amplitudes(&self) -> &Amplitudes {
        &self.amplitudes
    }

    /// Swap in a replacement map, returning the previous one.
    ///
    /// Negligible entries of `amplitudes` are pruned first.
    pub fn replace(&mut self, mut amplitudes: Amplitudes) -> Amplitudes {
        prune(&mut amplitudes);
        std::mem::replace(&mut self.amplitudes, amplitudes)
    }

    /// Σ|amp|² over all stored entries.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.values().map(Complex64::norm_sqr).sum()
    }

    /// Probability of reading 0 on `qubit`.
    pub fn probability_of_zero(&self, qubit: usize) -> f64 {
        self.amplitudes
            .iter()
            .filter(|(index, _)| index.is_zero(qubit))
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    // =========================================================================
    // Gate dispatch
    // =========================================================================

    /// Apply `gate` to `qubit`, conditioned on every position in `ctrl`.
    pub fn apply_gate(&mut self, gate: &Gate, qubit: usize, ctrl: &[usize]) {
        match *gate {
            Gate::X => self.x(qubit, ctrl),
            Gate::Y => self.y(qubit, ctrl),
            Gate::Z => self.z(qubit, ctrl),
            Gate::H => self.h(qubit, ctrl),
            Gate::S => self.s(qubit, ctrl),
            Gate::Sd => self.sd(qubit, ctrl),
            Gate::T => self.t(qubit, ctrl),
            Gate::Td => self.td(qubit, ctrl),
            Gate::P(lambda) => self.p(lambda, qubit, ctrl),
            Gate::Rx(theta) => self.rx(theta, qubit, ctrl),
            Gate::Ry(theta) => self.ry(theta, qubit, ctrl),
            Gate::Rz(lambda) => self.rz(lambda, qubit, ctrl),
            Gate::U2(phi, lambda) => self.u2(phi, lambda, qubit, ctrl),
            Gate::U3(theta, phi, lambda) => self.u3(theta, phi, lambda, qubit, ctrl),
        }
    }

    // =========================================================================
    // Re-keying gates
    // =========================================================================

    /// Pauli-X. Only flips keys, so amplitudes are moved rather than mixed.
    pub fn x(&mut self, qubit: usize, ctrl: &[usize]) {
        self.rekey(|index| {
            if index.all_ones(ctrl) {
                index.flipped(qubit)
            } else {
                index
            }
        });
    }

    /// Pauli-Y.
    pub fn y(&mut self, qubit: usize, ctrl: &[usize]) {
        self.apply_unitary(&Unitary2x2::y(), qubit, ctrl);
    }

    /// Hadamard.
    pub fn h(&mut self, qubit: usize, ctrl: &[usize]) {
        self.apply_unitary(&Unitary2x2::h(), qubit, ctrl);
    }

    /// Controlled-NOT on `target` with an extra `control`.
    pub fn cnot(&mut self, control: usize, target: usize, ctrl: &[usize]) {
        self.rekey(|index| {
            if index.is_one(control) && index.all_ones(ctrl) {
                index.flipped(target)
            } else {
                index
            }
        });
    }

    /// U2(φ, λ).
    pub fn u2(&mut self, phi: f64, lambda: f64, qubit: usize, ctrl: &[usize]) {
        self.apply_unitary(&Unitary2x2::u2(phi, lambda), qubit, ctrl);
    }

    /// U3(θ, φ, λ).
    pub fn u3(&mut self, theta: f64, phi: f64, lambda: f64, qubit: usize, ctrl: &[usize]) {
        self.apply_unitary(&Unitary2x2::u3(theta, phi, lambda), qubit, ctrl);
    }

    /// RX(θ) = U3(θ, -π/2, π/2).
    pub fn rx(&mut self, theta: f64, qubit: usize, ctrl: &[usize]) {
        self.u3(theta, -FRAC_PI_2, FRAC_PI_2, qubit, ctrl);
    }

    /// RY(θ) = U3(θ, 0, 0).
    pub fn ry(&mut self, theta: f64, qubit: usize, ctrl: &[usize]) {
        self.u3(theta, 0.0, 0.0, qubit, ctrl);
    }

    /// Exchange qubits `a` and `b` in every basis state.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a != b {
            self.rekey(|index| index.swapped(a, b));
        }
    }

    // =========================================================================
    // Phase-only gates (applied in place)
    // =========================================================================

    /// Pauli-Z.
    pub fn z(&mut self, qubit: usize, ctrl: &[usize]) {
        self.apply_phase(None, Some(Complex64::new(-1.0, 0.0)), qubit, ctrl);
    }

    /// S.
    pub fn s(&mut self, qubit: usize, ctrl: &[usize]) {
        self.apply_phase(None, Some(Complex64::new(0.0, 1.0)), qubit, ctrl);
    }

    /// S†.
    pub fn sd(&mut self, qubit: usize, ctrl: &[usize]) {
        self.apply_phase(None, Some(Complex64::new(0.0, -1.0)), qubit, ctrl);
    }

    /// T.
    pub fn t(&mut self, qubit: usize, ctrl: &[usize]) {
        self.p(T_PHASE, qubit, ctrl);
    }

    /// T†.
    pub fn td(&mut self, qubit: usize, ctrl: &[usize]) {
        self.p(-T_PHASE, qubit, ctrl);
    }

    /// Phase gate P(λ).
    pub fn p(&mut self, lambda: f64, qubit: usize, ctrl: &[usize]) {
        self.apply_phase(None, Some(Complex64::from_polar(1.0, lambda)), qubit, ctrl);
    }

    /// RZ(λ): e^{-iλ/2} on the 0 branch and e^{iλ/2} on the 1 branch.
    pub fn rz(&mut self, lambda: f64, qubit: usize, ctrl: &[usize]) {
        self.apply_phase(
            Some(Complex64::from_polar(1.0, -lambda / 2.0)),
            Some(Complex64::from_polar(1.0, lambda / 2.0)),
            qubit,
            ctrl,
        );
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure `qubit`, collapsing and renormalising the surviving branch.
    ///
    /// Outcome 0 is chosen when a uniform sample in `[0, 1)` is at most
    /// P(0). A branch with zero probability is never selected.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let outcome = self.sample(qubit, rng);
        self.collapse(qubit, outcome, false);
        outcome
    }

    /// Measure `qubit` and map the surviving branch back onto `qubit = 0`.
    pub fn measure_and_force_zero<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) {
        let outcome = self.sample(qubit, rng);
        self.collapse(qubit, outcome, true);
    }

    fn sample<R: Rng + ?Sized>(&self, qubit: usize, rng: &mut R) -> bool {
        let (p0, p1) = self.branch_probabilities(qubit);
        if p0 == 0.0 {
            return true;
        }
        if p1 == 0.0 {
            return false;
        }
        let draw: f64 = rng.r#gen();
        draw > p0 / (p0 + p1)
    }

    fn branch_probabilities(&self, qubit: usize) -> (f64, f64) {
        self.amplitudes
            .iter()
            .fold((0.0, 0.0), |(p0, p1), (index, amp)| {
                if index.is_one(qubit) {
                    (p0, p1 + amp.norm_sqr())
                } else {
                    (p0 + amp.norm_sqr(), p1)
                }
            })
    }

    fn collapse(&mut self, qubit: usize, outcome: bool, force_zero: bool) {
        let (p0, p1) = self.branch_probabilities(qubit);
        let norm = if outcome { p1 } else { p0 }.sqrt();
        let old = std::mem::take(&mut self.amplitudes);
        self.amplitudes = old
            .into_iter()
            .filter(|(index, _)| index.is_one(qubit) == outcome)
            .map(|(index, amp)| {
                let index = if force_zero && outcome {
                    index.flipped(qubit)
                } else {
                    index
                };
                (index, amp / norm)
            })
            .collect();
    }

    // =========================================================================
    // Composition and inspection
    // =========================================================================

    /// Tensor product with a state map over a disjoint set of qubits.
    #[must_use]
    pub fn tensor(&self, other: &StateMap) -> StateMap {
        let mut amplitudes =
            Amplitudes::with_capacity_and_hasher(self.len() * other.len(), Default::default());
        for (a, amp_a) in &self.amplitudes {
            for (b, amp_b) in &other.amplitudes {
                debug_assert!(a.is_disjoint(b), "tensor of overlapping partitions");
                amplitudes.insert(*a | *b, amp_a * amp_b);
            }
        }
        StateMap { amplitudes }
    }

    /// Group amplitudes by their low `size` qubits.
    ///
    /// Amplitudes sharing a group come from qubits above `size` and are
    /// sorted by real part, then imaginary part.
    pub fn dump(&self, size: usize) -> DumpRecord {
        let mut groups: BTreeMap<Vec<u64>, Vec<Complex64>> = BTreeMap::new();
        for (index, amp) in &self.amplitudes {
            groups.entry(index.truncated(size)).or_default().push(*amp);
        }
        let entries = groups
            .into_iter()
            .map(|(basis, mut amplitudes)| {
                sort_amplitudes(&mut amplitudes);
                DumpEntry { basis, amplitudes }
            })
            .collect();
        DumpRecord {
            num_qubits: size,
            entries,
        }
    }

    // =========================================================================
    // Kernels
    // =========================================================================

    fn apply_unitary(&mut self, matrix: &Unitary2x2, qubit: usize, ctrl: &[usize]) {
        debug_assert!(matrix.is_unitary(1e-9), "non-unitary gate matrix {matrix:?}");
        let mut next = Amplitudes::with_capacity_and_hasher(self.len() * 2, Default::default());
        for (index, &amp) in &self.amplitudes {
            if !index.all_ones(ctrl) {
                *next.entry(*index).or_default() += amp;
                continue;
            }
            let bit = index.is_one(qubit);
            let (to_zero, to_one) = matrix.column(bit);
            let (zero, one) = if bit {
                (index.flipped(qubit), *index)
            } else {
                (*index, index.flipped(qubit))
            };
            if to_zero != Complex64::default() {
                *next.entry(zero).or_default() += amp * to_zero;
            }
            if to_one != Complex64::default() {
                *next.entry(one).or_default() += amp * to_one;
            }
        }
        prune(&mut next);
        self.amplitudes = next;
    }

    fn apply_phase(
        &mut self,
        phase_zero: Option<Complex64>,
        phase_one: Option<Complex64>,
        qubit: usize,
        ctrl: &[usize],
    ) {
        for (index, amp) in &mut self.amplitudes {
            if !index.all_ones(ctrl) {
                continue;
            }
            let phase = if index.is_one(qubit) {
                phase_one
            } else {
                phase_zero
            };
            if let Some(phase) = phase {
                *amp *= phase;
            }
        }
    }

    fn rekey(&mut self, f: impl Fn(BitIndex) -> BitIndex) {
        let old = std::mem::take(&mut self.amplitudes);
        self.amplitudes = old.into_iter().map(|(index, amp)| (f(index), amp)).collect();
    }
}

impl Default for StateMap {
    fn default() -> Self {
        Self::new()
    }
}

fn prune(amplitudes: &mut Amplitudes) {
    amplitudes.retain(|_, amp| amp.norm() >= EPSILON);
}
