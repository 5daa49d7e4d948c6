//! Plugin capability contract and dynamic loading.
//!
//! A plugin is an externally supplied transform over a canonically ordered
//! slice of the quantum state. Before a plugin runs, the simulator:
//!
//! 1. merges the partitions of every target and control qubit,
//! 2. drops controls whose value is classically known to be 1 (and skips the
//!    call outright when one is known to be 0),
//! 3. swaps qubit positions so the targets occupy `[0, n)` in the order they
//!    were given and the remaining controls occupy `[n, n + c)`,
//! 4. hands over only the basis states in which every control is 1.
//!
//! After the call the layout is swapped back and the untouched basis states
//! are merged in again. A plugin must leave positions `[n, n + c)` as they
//! are, and must apply its conjugate transpose when `inverse` is set.
//!
//! # Shared libraries
//!
//! With the `dynamic-plugins` feature, plugins can live in shared libraries
//! (`lib<name>.so`, `lib<name>.dylib` or `<name>.dll`) that export a
//! constructor named `sparq_plugin_create`. The [`export_plugin!`] macro
//! emits that symbol:
//!
//! ```ignore
//! use sparq_sim::{Plugin, SimResult};
//! use sparq_state::StateMap;
//!
//! struct Flip;
//!
//! impl Plugin for Flip {
//!     fn name(&self) -> &str {
//!         "flip"
//!     }
//!
//!     fn run(&self, state: &mut StateMap, num_qubits: usize, _args: &str,
//!            _inverse: bool, _num_controls: usize) -> SimResult<()> {
//!         for q in 0..num_qubits {
//!             state.x(q, &[]);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! sparq_sim::export_plugin!(Flip);
//! ```

use sparq_state::StateMap;

use crate::error::SimResult;
#[cfg(feature = "dynamic-plugins")]
use crate::error::SimError;

/// Name of the constructor symbol a plugin library must export.
pub const PLUGIN_CREATE_SYMBOL: &str = "sparq_plugin_create";

/// A unitary (or classical reversible) transform invoked by name.
pub trait Plugin: Send + Sync {
    /// Name the plugin is resolved by.
    fn name(&self) -> &str;

    /// Transform `state` in place.
    ///
    /// `state` is already in canonical layout: targets at `[0, num_qubits)`,
    /// controls at `[num_qubits, num_qubits + num_controls)`, all controls 1.
    fn run(
        &self,
        state: &mut StateMap,
        num_qubits: usize,
        args: &str,
        inverse: bool,
        num_controls: usize,
    ) -> SimResult<()>;
}

/// Emit the `sparq_plugin_create` constructor for a plugin value.
#[macro_export]
macro_rules! export_plugin {
    ($plugin:expr) => {
        #[unsafe(no_mangle)]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn sparq_plugin_create() -> *mut dyn $crate::Plugin {
            let plugin: ::std::boxed::Box<dyn $crate::Plugin> = ::std::boxed::Box::new($plugin);
            ::std::boxed::Box::into_raw(plugin)
        }
    };
}

/// Type signature of the constructor exported by plugin libraries.
///
/// The returned pointer is a Rust trait object, so this is Rust-to-Rust FFI
/// only: host and plugin must be built with the same compiler and allocator.
// Fat pointer across FFI: both sides must agree on the vtable layout.
#[cfg(feature = "dynamic-plugins")]
#[allow(improper_ctypes_definitions)]
pub type PluginCreateFn = unsafe extern "C" fn() -> *mut dyn Plugin;

/// A plugin backed by a shared library.
///
/// `plugin` is declared before `_library` so it is dropped while its code
/// is still mapped.
#[cfg(feature = "dynamic-plugins")]
pub struct LoadedPlugin {
    plugin: Box<dyn Plugin>,
    _library: libloading::Library,
    path: std::path::PathBuf,
}

#[cfg(feature = "dynamic-plugins")]
impl LoadedPlugin {
    /// Load a plugin from a shared library path.
    ///
    /// # Safety
    ///
    /// The library must export `sparq_plugin_create` with the
    /// [`PluginCreateFn`] signature. Loading untrusted libraries runs
    /// arbitrary code.
    pub unsafe fn load(path: impl AsRef<std::path::Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| SimError::PluginLoad {
            path: path.display().to_string(),
            reason,
        };

        let library = unsafe { libloading::Library::new(path) }
            .map_err(|e| load_error(e.to_string()))?;

        let create_fn: libloading::Symbol<PluginCreateFn> =
            unsafe { library.get(PLUGIN_CREATE_SYMBOL.as_bytes()) }
                .map_err(|e| load_error(format!("missing {PLUGIN_CREATE_SYMBOL}: {e}")))?;

        let raw_plugin = unsafe { create_fn() };
        if raw_plugin.is_null() {
            return Err(load_error("constructor returned null".into()));
        }
        let plugin = unsafe { Box::from_raw(raw_plugin) };

        Ok(Self {
            plugin,
            _library: library,
            path: path.to_path_buf(),
        })
    }

    /// The loaded capability.
    pub fn plugin(&self) -> &dyn Plugin {
        self.plugin.as_ref()
    }

    /// Library the plugin was loaded from.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
