//! Error types for the simulator crate.

use thiserror::Error;

use crate::qubit::QubitId;

/// Errors that can occur while driving the simulator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The logical qubit has no physical slot.
    #[error("Qubit {0} is not allocated")]
    QubitNotAllocated(QubitId),

    /// The logical qubit already has a physical slot.
    #[error("Qubit {0} is already allocated")]
    QubitAlreadyAllocated(QubitId),

    /// Every physical slot is in use.
    #[error("Qubit limit exceeded: all {0} physical qubits are in use")]
    QubitLimitExceeded(usize),

    /// A qubit list names the same qubit twice.
    #[error("Qubit {0} appears more than once in the operand list")]
    DuplicateQubit(QubitId),

    /// No measurement has been recorded for the qubit.
    #[error("Qubit {0} has not been measured")]
    BitNotMeasured(QubitId),

    /// Dump index out of range.
    #[error("Dump {index} not found ({count} recorded)")]
    DumpNotFound {
        /// Requested index.
        index: usize,
        /// Number of dumps recorded.
        count: usize,
    },

    /// No built-in plugin and no library on the search path matched.
    #[error("Plugin '{name}' not found (search path: '{search_path}')")]
    PluginNotFound {
        /// Requested plugin name.
        name: String,
        /// The colon-separated search path that was scanned.
        search_path: String,
    },

    /// A plugin library exists but could not be loaded.
    #[error("Failed to load plugin '{path}': {reason}")]
    PluginLoad {
        /// Library path.
        path: String,
        /// Loader message.
        reason: String,
    },

    /// A plugin rejected its input.
    #[error("Plugin '{name}' failed: {reason}")]
    Plugin {
        /// Plugin name.
        name: String,
        /// Failure message.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
