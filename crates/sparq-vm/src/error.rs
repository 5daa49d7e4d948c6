//! Error types for the VM crate.

use sparq_sim::{QubitId, SimError};
use thiserror::Error;

/// Errors raised while compiling or running a program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VmError {
    /// Two blocks share a label.
    #[error("Duplicate label '{0}'")]
    DuplicateLabel(String),

    /// A jump or branch names a label that no block defines.
    #[error("Block '{label}' refers to undefined label '{target}'")]
    UndefinedLabel {
        /// Block containing the reference.
        label: String,
        /// The missing label.
        target: String,
    },

    /// The entry label names no block.
    #[error("Entry label '{0}' is not defined")]
    MissingEntry(String),

    /// No block is marked as the terminal block.
    #[error("Program has no END block")]
    MissingEnd,

    /// More than one block is marked as the terminal block.
    #[error("Program has more than one END block: '{first}' and '{second}'")]
    DuplicateEnd {
        /// First terminal block.
        first: String,
        /// Second terminal block.
        second: String,
    },

    /// A gate received the wrong number of angle arguments.
    #[error("In block '{label}': gate {name} expects {expected} arguments, got {got}")]
    ArgumentCount {
        /// Block containing the gate.
        label: String,
        /// Gate name.
        name: String,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// A gate lists its target among its controls.
    #[error("In block '{label}': gate {name} uses its target {qubit} as a control")]
    ControlIsTarget {
        /// Block containing the gate.
        label: String,
        /// Gate name.
        name: String,
        /// The offending qubit.
        qubit: QubitId,
    },

    /// A measurement covers more qubits than a register can hold.
    #[error("In block '{label}': cannot pack {count} measured bits into a 64-bit register")]
    MeasureTooWide {
        /// Block containing the measurement.
        label: String,
        /// Number of measured qubits.
        count: usize,
    },

    /// Unrecognized gate or classical operator name.
    #[error("In block '{label}': unknown operation '{name}'")]
    UnknownOperation {
        /// Block containing the operation.
        label: String,
        /// The unrecognized name.
        name: String,
    },

    /// Integer division by zero, overflow or an invalid shift.
    #[error("Arithmetic error in block '{label}' at `{operation}`: {reason}")]
    Arithmetic {
        /// Block being executed.
        label: String,
        /// The failing operation.
        operation: String,
        /// What went wrong.
        reason: String,
    },

    /// The simulator rejected an operation during a run.
    #[error("Simulation error in block '{label}' at `{operation}`: {source}")]
    Simulation {
        /// Block being executed.
        label: String,
        /// The failing operation.
        operation: String,
        /// Underlying simulator error.
        #[source]
        source: SimError,
    },

    /// Simulator error outside of a run (dump access, snapshot export).
    #[error(transparent)]
    Simulator(#[from] SimError),

    /// The instruction tree could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for VM operations.
pub type VmResult<T> = Result<T, VmError>;
