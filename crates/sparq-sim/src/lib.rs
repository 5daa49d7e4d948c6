//! Sparq simulator runtime
//!
//! This crate manages the quantum state of a running program: logical qubit
//! allocation, lazily merged partitions of entangled qubits, classical
//! registers, measurement results, dump history and the plugin bridge for
//! externally supplied transforms.
//!
//! # Example
//!
//! ```
//! use sparq_sim::{QubitId, Simulator};
//! use sparq_state::Gate;
//!
//! let mut sim = Simulator::with_seed(7);
//! let (a, b) = (QubitId(0), QubitId(1));
//! sim.alloc(a, false)?;
//! sim.alloc(b, false)?;
//! assert_eq!(sim.partition_count(), 2);
//!
//! sim.apply_gate(&Gate::H, a, &[])?;
//! sim.apply_gate(&Gate::X, b, &[a])?;
//! assert_eq!(sim.partition_count(), 1);
//!
//! let index = sim.dump(&[a, b])?;
//! let record = sim.get_dump(index)?;
//! assert!((record.probability(0b00) - 0.5).abs() < 1e-10);
//! assert!((record.probability(0b11) - 0.5).abs() < 1e-10);
//!
//! assert_eq!(sim.measure(a)?, sim.measure(b)?);
//! # Ok::<(), sparq_sim::SimError>(())
//! ```
//!
//! # Plugins
//!
//! Plugins implement [`Plugin`] and are resolved by name through a
//! [`PluginRegistry`]: built-ins first, then shared libraries on the
//! configured search path (with the default `dynamic-plugins` feature).

pub mod builtin;
pub mod config;
pub mod error;
pub mod partition;
pub mod plugin;
pub mod qubit;
pub mod registry;
pub mod simulator;
pub mod snapshot;

pub use builtin::AddConstant;
pub use config::RuntimeConfig;
pub use error::{SimError, SimResult};
pub use partition::Partition;
#[cfg(feature = "dynamic-plugins")]
pub use plugin::LoadedPlugin;
pub use plugin::{PLUGIN_CREATE_SYMBOL, Plugin};
pub use qubit::{QubitId, RegisterId};
pub use registry::PluginRegistry;
pub use simulator::Simulator;
