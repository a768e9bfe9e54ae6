//! Item factory: command id → menu item descriptor.

use crate::menu::descriptor::{MenuAction, MenuItemDescriptor};
use crate::menu::MenuError;
use crate::services::{AcceleratorResolver, CommandRegistry};
use crate::state::AppState;
use std::collections::HashMap;

/// Builds menu item descriptors from command identifiers.
///
/// A pure lookup over the command registry and the accelerator
/// resolver; it never mutates either.
pub struct ItemFactory<'a> {
    commands: &'a dyn CommandRegistry,
    accelerators: &'a dyn AcceleratorResolver,
}

impl<'a> ItemFactory<'a> {
    /// Create a factory over the given collaborators.
    pub fn new(
        commands: &'a dyn CommandRegistry,
        accelerators: &'a dyn AcceleratorResolver,
    ) -> Self {
        Self {
            commands,
            accelerators,
        }
    }

    /// Build the descriptor for one command id.
    ///
    /// Fails when the id has no registered metadata. For static ids the
    /// caller must propagate this: silently omitting the item would
    /// break menu layout elsewhere.
    pub fn build_one(&self, id: &str, state: &AppState) -> Result<MenuItemDescriptor, MenuError> {
        let metadata = self
            .commands
            .metadata(id)
            .ok_or_else(|| MenuError::UnknownCommand(id.to_string()))?;

        Ok(MenuItemDescriptor::command(id, metadata.label)
            .with_accelerator(self.accelerators.accelerator_for(id))
            .with_enabled(self.commands.is_enabled(id, state))
            .with_action(MenuAction::command(id)))
    }

    /// Build descriptors for a list of command ids.
    pub fn build(
        &self,
        ids: &[&str],
        state: &AppState,
    ) -> Result<HashMap<String, MenuItemDescriptor>, MenuError> {
        let mut items = HashMap::with_capacity(ids.len());
        for id in ids {
            items.insert(id.to_string(), self.build_one(id, state)?);
        }
        Ok(items)
    }
}
