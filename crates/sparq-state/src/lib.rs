//! Sparse quantum state representation for sparq.
//!
//! This crate holds the amplitude-level state of one coherent subsystem
//! (a *partition*) and the gate algebra acting on it. It is the numerical
//! core underneath the partition manager in `sparq-sim`.
//!
//! # Overview
//!
//! A [`StateMap`] stores only the basis states with non-negligible amplitude,
//! keyed by a fixed-width [`BitIndex`]. Bit *i* of a key is the classical value
//! of physical qubit *i* in that basis state, so two state maps over disjoint
//! qubits combine with a plain bitwise OR in [`StateMap::tensor`].
//!
//! # Core Components
//!
//! - **Basis states**: [`BitIndex`], a [`MAX_QUBITS`]-bit vector
//! - **Gates**: [`Gate`] for the built-in single-qubit gate set and
//!   [`Unitary2x2`] for their matrices
//! - **State**: [`StateMap`] with controlled gates, swap, measurement,
//!   tensor product and marginal dumps
//! - **Dumps**: [`DumpRecord`], a deterministic snapshot of a qubit subset
//!
//! # Example: Bell State
//!
//! ```rust
//! use sparq_state::{Gate, StateMap};
//!
//! let mut state = StateMap::new();
//! state.h(0, &[]);
//! state.cnot(0, 1, &[]);
//!
//! let dump = state.dump(2);
//! assert_eq!(dump.len(), 2);
//! assert!((dump.probability(0b00) - 0.5).abs() < 1e-10);
//! assert!((dump.probability(0b11) - 0.5).abs() < 1e-10);
//!
//! // Gates are also available as values.
//! state.apply_gate(&Gate::Rz(0.25), 1, &[0]);
//! assert!((state.norm_sqr() - 1.0).abs() < 1e-10);
//! ```
//!
//! # Numeric Policy
//!
//! Amplitudes whose magnitude falls below [`EPSILON`] are pruned after every
//! re-keying gate. No other approximation is applied.

pub mod dump;
pub mod gate;
pub mod index;
pub mod state;
pub mod unitary;

pub use dump::{DumpEntry, DumpRecord};
pub use gate::Gate;
pub use index::{BitIndex, MAX_QUBITS};
pub use state::{Amplitudes, EPSILON, StateMap};
pub use unitary::Unitary2x2;
