//! Plugin contribution store.
//!
//! Plugins contribute menu items in two shapes: pre-built descriptors
//! targeting a root by key, and view declarations with an explicit
//! location. Contributions are enumerated per plugin in registration
//! order so assembly stays deterministic across rebuilds.

use indexmap::IndexMap;
use jot_core::services::{ExtensionHost, MenuContribution, ViewInfo};
use std::sync::Mutex;

/// Everything one plugin contributes to the menu bar.
#[derive(Debug, Clone, Default)]
pub struct PluginContribution {
    /// Pre-built items targeting a root menu by key.
    pub menu_items: Vec<MenuContribution>,
    /// View declarations with an explicit location.
    pub view_infos: Vec<ViewInfo>,
}

/// In-process plugin registry.
#[derive(Default)]
pub struct PluginStore {
    plugins: Mutex<IndexMap<String, PluginContribution>>,
}

impl PluginStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a plugin's contributions.
    pub fn register(&self, plugin_id: &str, contribution: PluginContribution) {
        self.plugins
            .lock()
            .unwrap()
            .insert(plugin_id.to_string(), contribution);
    }

    /// Remove a plugin's contributions.
    pub fn unregister(&self, plugin_id: &str) {
        self.plugins.lock().unwrap().shift_remove(plugin_id);
    }

    /// Registered plugin ids, in registration order.
    pub fn plugin_ids(&self) -> Vec<String> {
        self.plugins.lock().unwrap().keys().cloned().collect()
    }
}

impl ExtensionHost for PluginStore {
    fn contributed_menu_items(&self) -> Vec<MenuContribution> {
        self.plugins
            .lock()
            .unwrap()
            .values()
            .flat_map(|c| c.menu_items.clone())
            .collect()
    }

    fn contributed_view_infos(&self) -> Vec<ViewInfo> {
        self.plugins
            .lock()
            .unwrap()
            .values()
            .flat_map(|c| c.view_infos.clone())
            .collect()
    }
}
