//! Plugin resolution by name.
//!
//! The [`PluginRegistry`] checks built-in plugins first, then scans the
//! colon-separated search path for a shared library named after the plugin.
//! The first library that loads wins and is kept for the registry's lifetime.

use rustc_hash::FxHashMap;
use tracing::debug;
#[cfg(feature = "dynamic-plugins")]
use tracing::{info, warn};

use crate::builtin::AddConstant;
use crate::config;
use crate::error::{SimError, SimResult};
use crate::plugin::Plugin;

/// Name → plugin lookup with lazy library loading.
pub struct PluginRegistry {
    builtins: FxHashMap<String, Box<dyn Plugin>>,
    #[cfg(feature = "dynamic-plugins")]
    loaded: FxHashMap<String, crate::plugin::LoadedPlugin>,
    search_path: String,
}

impl PluginRegistry {
    /// A registry with the built-in plugins and the global search path.
    pub fn new() -> Self {
        Self::with_search_path(config::plugin_path())
    }

    /// A registry with the built-in plugins and an explicit search path.
    pub fn with_search_path(search_path: impl Into<String>) -> Self {
        let mut registry = Self {
            builtins: FxHashMap::default(),
            #[cfg(feature = "dynamic-plugins")]
            loaded: FxHashMap::default(),
            search_path: search_path.into(),
        };
        registry.register(AddConstant);
        registry
    }

    /// Register a plugin under its own name, replacing any previous one.
    pub fn register(&mut self, plugin: impl Plugin + 'static) {
        let name = plugin.name().to_string();
        debug!("Registering built-in plugin: {}", name);
        self.builtins.insert(name, Box::new(plugin));
    }

    /// The colon-separated library search path.
    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    /// Replace the library search path. Already loaded libraries are kept.
    pub fn set_search_path(&mut self, search_path: impl Into<String>) {
        self.search_path = search_path.into();
    }

    /// Check whether `name` resolves without touching the filesystem.
    pub fn is_resolved(&self, name: &str) -> bool {
        if self.builtins.contains_key(name) {
            return true;
        }
        #[cfg(feature = "dynamic-plugins")]
        if self.loaded.contains_key(name) {
            return true;
        }
        false
    }

    /// Names of built-in and already loaded plugins, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builtins.keys().cloned().collect();
        #[cfg(feature = "dynamic-plugins")]
        names.extend(self.loaded.keys().cloned());
        names.sort();
        names.dedup();
        names
    }

    /// Resolve `name` to a plugin.
    ///
    /// Fails with [`SimError::PluginNotFound`] when neither a built-in nor a
    /// loadable library on the search path matches.
    pub fn resolve(&mut self, name: &str) -> SimResult<&dyn Plugin> {
        if self.builtins.contains_key(name) {
            return Ok(self.builtins[name].as_ref());
        }
        self.resolve_dynamic(name)
    }

    #[cfg(feature = "dynamic-plugins")]
    fn resolve_dynamic(&mut self, name: &str) -> SimResult<&dyn Plugin> {
        if !self.loaded.contains_key(name) {
            let loaded = self.load_from_search_path(name)?;
            self.loaded.insert(name.to_string(), loaded);
        }
        Ok(self.loaded[name].plugin())
    }

    #[cfg(not(feature = "dynamic-plugins"))]
    fn resolve_dynamic(&mut self, name: &str) -> SimResult<&dyn Plugin> {
        Err(self.not_found(name))
    }

    #[cfg(feature = "dynamic-plugins")]
    fn load_from_search_path(&self, name: &str) -> SimResult<crate::plugin::LoadedPlugin> {
        let file_name = libloading::library_filename(name);

        for dir in self.search_path.split(':').filter(|dir| !dir.is_empty()) {
            let candidate = std::path::Path::new(dir).join(&file_name);
            if !candidate.is_file() {
                continue;
            }

            match unsafe { crate::plugin::LoadedPlugin::load(&candidate) } {
                Ok(loaded) => {
                    info!(
                        "Loaded plugin '{}' ({}) from {}",
                        name,
                        loaded.plugin().name(),
                        loaded.path().display()
                    );
                    return Ok(loaded);
                }
                Err(e) => {
                    warn!("Failed to load plugin '{}': {}", candidate.display(), e);
                }
            }
        }

        Err(self.not_found(name))
    }

    fn not_found(&self, name: &str) -> SimError {
        SimError::PluginNotFound {
            name: name.to_string(),
            search_path: self.search_path.clone(),
        }
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.available())
            .field("search_path", &self.search_path)
            .finish()
    }
}
