//! State reconciler.
//!
//! Pushes enabled/checked flags onto the installed native menu by
//! stable item id, without touching structure, labels or accelerators.
//! Identifiers no longer present in the handle are tolerated as benign
//! races and silently skipped.

use crate::menu::assembler::STATIC_COMMANDS;
use crate::menu::sections::{sort_field_item_id, sort_reverse_item_id, SortKind};
use crate::services::{CommandRegistry, SettingsStore};
use crate::state::{keys, AppState};
use crate::toolkit::MenuHandle;
use std::sync::Arc;

/// Applies live flag state to an already-installed menu.
pub struct StateReconciler {
    commands: Arc<dyn CommandRegistry>,
    settings: Arc<dyn SettingsStore>,
}

impl StateReconciler {
    /// Create a reconciler over the given collaborators.
    pub fn new(commands: Arc<dyn CommandRegistry>, settings: Arc<dyn SettingsStore>) -> Self {
        Self { commands, settings }
    }

    pub(crate) fn commands(&self) -> &Arc<dyn CommandRegistry> {
        &self.commands
    }

    /// Update enabled/checked flags on the handle from the state
    /// snapshot. Idempotent: re-running with unchanged state produces
    /// no observable change.
    pub fn apply(&self, state: &AppState, handle: &dyn MenuHandle) {
        for id in STATIC_COMMANDS {
            // Ids absent from the current template (other platform,
            // collapsed route) fall through as no-ops.
            handle.set_enabled(id, self.commands.is_enabled(id, state));
        }

        for kind in [SortKind::Notes, SortKind::Folders] {
            let current = state.sort_order(kind);
            for (value, _label) in self.settings.enum_options(kind.field_key()) {
                handle.set_checked(&sort_field_item_id(kind, &value), current.field == value);
            }
            handle.set_checked(&sort_reverse_item_id(kind), current.reverse);
        }

        handle.set_checked(keys::SHOW_NOTE_COUNTS, state.show_note_counts);
        handle.set_checked(keys::UNCOMPLETED_TODOS_ON_TOP, state.uncompleted_todos_on_top);
        handle.set_checked(keys::SHOW_COMPLETED_TODOS, state.show_completed_todos);
    }
}
