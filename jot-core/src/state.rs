//! Application state snapshot consumed by the menu engine.
//!
//! The reconciler and the assembler never read live stores directly;
//! they consume an immutable [`AppState`] captured by the caller, which
//! keeps the pure "build template" step separate from the side-effecting
//! "apply flags" step.

use crate::services::SettingsStore;

/// Setting keys owned by the menu engine's collaborators.
pub mod keys {
    /// Field the note list is sorted by (enumerated).
    pub const NOTES_SORT_FIELD: &str = "notes.sortOrder.field";
    /// Whether the note sort order is reversed.
    pub const NOTES_SORT_REVERSE: &str = "notes.sortOrder.reverse";
    /// Field the notebook list is sorted by (enumerated).
    pub const FOLDERS_SORT_FIELD: &str = "folders.sortOrder.field";
    /// Whether the notebook sort order is reversed.
    pub const FOLDERS_SORT_REVERSE: &str = "folders.sortOrder.reverse";
    /// Show note counts next to notebooks in the sidebar.
    pub const SHOW_NOTE_COUNTS: &str = "showNoteCounts";
    /// Sort uncompleted to-dos above other notes.
    pub const UNCOMPLETED_TODOS_ON_TOP: &str = "uncompletedTodosOnTop";
    /// Show completed to-dos in the note list.
    pub const SHOW_COMPLETED_TODOS: &str = "showCompletedTodos";
    /// Cycle position of the layout toggle button.
    pub const LAYOUT_BUTTON_SEQUENCE: &str = "layoutButtonSequence";
}

/// The screen the application currently displays.
///
/// Any route other than [`Route::Main`] collapses the menu bar to a
/// minimal degraded-but-safe template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The main three-pane screen.
    Main,
    /// The settings screen.
    Settings,
    /// The synchronization status screen.
    SyncStatus,
    /// The log viewer.
    Log,
}

/// Sort order of one entity kind (notes or notebooks).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortOrder {
    /// The enumerated field value the list is sorted by.
    pub field: String,
    /// Whether the order is reversed.
    pub reverse: bool,
}

/// Immutable snapshot of the application state relevant to the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// The active route.
    pub route: Route,
    /// Number of currently selected notes.
    pub selected_note_count: usize,
    /// Cycle position of the layout toggle button.
    pub layout_sequence: i64,
    /// Sort order of the note list.
    pub notes_sort: SortOrder,
    /// Sort order of the notebook list.
    pub folders_sort: SortOrder,
    /// Show note counts next to notebooks.
    pub show_note_counts: bool,
    /// Sort uncompleted to-dos above other notes.
    pub uncompleted_todos_on_top: bool,
    /// Show completed to-dos in the note list.
    pub show_completed_todos: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Main,
            selected_note_count: 0,
            layout_sequence: 0,
            notes_sort: SortOrder::default(),
            folders_sort: SortOrder::default(),
            show_note_counts: true,
            uncompleted_todos_on_top: true,
            show_completed_todos: true,
        }
    }
}

impl AppState {
    /// Capture a snapshot from the settings store.
    ///
    /// Selection state is owned by the caller since it does not live in
    /// settings.
    pub fn capture(route: Route, selected_note_count: usize, settings: &dyn SettingsStore) -> Self {
        Self {
            route,
            selected_note_count,
            layout_sequence: settings.get(keys::LAYOUT_BUTTON_SEQUENCE).as_int(),
            notes_sort: SortOrder {
                field: settings.get(keys::NOTES_SORT_FIELD).as_text(),
                reverse: settings.get(keys::NOTES_SORT_REVERSE).as_bool(),
            },
            folders_sort: SortOrder {
                field: settings.get(keys::FOLDERS_SORT_FIELD).as_text(),
                reverse: settings.get(keys::FOLDERS_SORT_REVERSE).as_bool(),
            },
            show_note_counts: settings.get(keys::SHOW_NOTE_COUNTS).as_bool(),
            uncompleted_todos_on_top: settings.get(keys::UNCOMPLETED_TODOS_ON_TOP).as_bool(),
            show_completed_todos: settings.get(keys::SHOW_COMPLETED_TODOS).as_bool(),
        }
    }

    /// Sort order for the given entity kind.
    pub fn sort_order(&self, kind: crate::menu::sections::SortKind) -> &SortOrder {
        match kind {
            crate::menu::sections::SortKind::Notes => &self.notes_sort,
            crate::menu::sections::SortKind::Folders => &self.folders_sort,
        }
    }
}
