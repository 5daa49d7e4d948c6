//! Process-wide runtime configuration.
//!
//! Holds the plugin search path, the default random seed, the directory
//! dump snapshots are written to and the physical qubit limit.
//!
//! Values are initialised once from the environment:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `SPARQ_PLUGIN_PATH` | `plugin_path` | `~/.sparq/plugins` |
//! | `SPARQ_SEED` | `seed` | drawn from the OS entropy source |
//! | `SPARQ_DUMP_DIR` | `dump_dir` | the system temp directory |
//! | `SPARQ_MAX_QUBITS` | `max_qubits` | `1024` |
//!
//! and can be changed at any time before a run through the setters below.

use serde::{Deserialize, Serialize};
use sparq_state::MAX_QUBITS;
use std::path::PathBuf;
use std::sync::{LazyLock, PoisonError, RwLock};

static CONFIG: LazyLock<RwLock<RuntimeConfig>> =
    LazyLock::new(|| RwLock::new(RuntimeConfig::from_env()));

/// Snapshot of the process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Colon-separated list of directories searched for plugin libraries.
    pub plugin_path: String,
    /// Seed for newly created simulators.
    pub seed: u64,
    /// Directory that dump snapshot files are written to.
    pub dump_dir: PathBuf,
    /// Number of physical qubit slots a simulator may hand out.
    pub max_qubits: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, falling back to
    /// defaults for missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("SPARQ_PLUGIN_PATH") {
            config.plugin_path = path;
        }
        if let Some(seed) = lookup("SPARQ_SEED") {
            if let Ok(val) = seed.trim().parse() {
                config.seed = val;
            }
        }
        if let Some(dir) = lookup("SPARQ_DUMP_DIR") {
            config.dump_dir = PathBuf::from(dir);
        }
        if let Some(max) = lookup("SPARQ_MAX_QUBITS") {
            if let Ok(val) = max.trim().parse::<usize>() {
                config.max_qubits = val.min(MAX_QUBITS);
            }
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            plugin_path: default_plugin_path(),
            seed: rand::random(),
            dump_dir: std::env::temp_dir(),
            max_qubits: MAX_QUBITS,
        }
    }
}

fn default_plugin_path() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sparq")
        .join("plugins")
        .display()
        .to_string()
}

/// A copy of the current settings.
pub fn current() -> RuntimeConfig {
    CONFIG.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// The plugin search path.
pub fn plugin_path() -> String {
    CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .plugin_path
        .clone()
}

/// Replace the plugin search path.
pub fn set_plugin_path(path: impl Into<String>) {
    CONFIG
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .plugin_path = path.into();
}

/// The seed used by [`Simulator::new`](crate::Simulator::new).
pub fn seed() -> u64 {
    CONFIG.read().unwrap_or_else(PoisonError::into_inner).seed
}

/// Replace the default seed.
pub fn set_seed(seed: u64) {
    CONFIG.write().unwrap_or_else(PoisonError::into_inner).seed = seed;
}

/// Directory for dump snapshot files.
pub fn dump_dir() -> PathBuf {
    CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .dump_dir
        .clone()
}

/// Replace the dump snapshot directory.
pub fn set_dump_dir(dir: impl Into<PathBuf>) {
    CONFIG.write().unwrap_or_else(PoisonError::into_inner).dump_dir = dir.into();
}

/// Physical qubit limit for new simulators.
pub fn max_qubits() -> usize {
    CONFIG.read().unwrap_or_else(PoisonError::into_inner).max_qubits
}

/// Replace the physical qubit limit. Values above the index width are clamped.
pub fn set_max_qubits(max: usize) {
    CONFIG.write().unwrap_or_else(PoisonError::into_inner).max_qubits = max.min(MAX_QUBITS);
}
