//! Command registry service.
//!
//! Declarations are kept in registration order; the engine looks them
//! up by id when building menu items and when reconciling enablement.

use indexmap::IndexMap;
use jot_core::services::{CommandArgs, CommandMetadata, CommandRegistry};
use jot_core::state::AppState;
use std::sync::{Arc, Mutex};

/// Enablement predicate over the current application state.
pub type EnabledFn = Arc<dyn Fn(&AppState) -> bool + Send + Sync>;

/// Handler invoked when a command is dispatched.
pub type HandlerFn = Arc<dyn Fn(CommandArgs) + Send + Sync>;

/// A registered command.
#[derive(Clone)]
pub struct CommandDeclaration {
    /// Stable command id.
    pub id: String,
    /// Localized menu label.
    pub label: String,
    enabled: EnabledFn,
    handler: HandlerFn,
}

impl CommandDeclaration {
    /// Declare an always-enabled command with a no-op handler.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: Arc::new(|_| true),
            handler: Arc::new(|_| {}),
        }
    }

    /// Replace the enablement predicate.
    pub fn with_enabled(
        mut self,
        enabled: impl Fn(&AppState) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.enabled = Arc::new(enabled);
        self
    }

    /// Replace the dispatch handler.
    pub fn with_handler(mut self, handler: impl Fn(CommandArgs) + Send + Sync + 'static) -> Self {
        self.handler = Arc::new(handler);
        self
    }
}

/// In-process command registry.
#[derive(Default)]
pub struct CommandService {
    declarations: Mutex<IndexMap<String, CommandDeclaration>>,
}

impl CommandService {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-loaded with the standard declarations.
    pub fn with_standard_declarations() -> Self {
        let service = Self::new();
        for declaration in standard_declarations() {
            service.register(declaration);
        }
        service
    }

    /// Register a declaration, replacing any previous one with the
    /// same id.
    pub fn register(&self, declaration: CommandDeclaration) {
        self.declarations
            .lock()
            .unwrap()
            .insert(declaration.id.clone(), declaration);
    }

    /// Ids of every registered command, in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.declarations.lock().unwrap().keys().cloned().collect()
    }
}

impl CommandRegistry for CommandService {
    fn metadata(&self, id: &str) -> Option<CommandMetadata> {
        self.declarations
            .lock()
            .unwrap()
            .get(id)
            .map(|d| CommandMetadata {
                label: d.label.clone(),
            })
    }

    fn is_enabled(&self, id: &str, state: &AppState) -> bool {
        match self.declarations.lock().unwrap().get(id) {
            Some(d) => (d.enabled)(state),
            None => false,
        }
    }

    fn execute(&self, id: &str, args: CommandArgs) {
        let handler = self.declarations.lock().unwrap().get(id).map(|d| d.handler.clone());
        match handler {
            Some(handler) => handler(args),
            None => log::warn!("ignoring dispatch of unknown command `{}`", id),
        }
    }
}

fn needs_selection(state: &AppState) -> bool {
    state.selected_note_count > 0
}

/// Declarations for every command the static menu skeleton references,
/// plus the `import`/`export` dispatch targets of the dynamic lists.
///
/// Handlers are dispatch points the application wires up at startup;
/// out of the box they only log.
pub fn standard_declarations() -> Vec<CommandDeclaration> {
    let stub = |id: &'static str| {
        move |args: CommandArgs| {
            log::debug!("command `{}` dispatched with {:?}", id, args);
        }
    };

    vec![
        CommandDeclaration::new("newNote", "New note").with_handler(stub("newNote")),
        CommandDeclaration::new("newTodo", "New to-do").with_handler(stub("newTodo")),
        CommandDeclaration::new("newFolder", "New notebook").with_handler(stub("newFolder")),
        CommandDeclaration::new("synchronize", "Synchronise").with_handler(stub("synchronize")),
        CommandDeclaration::new("print", "Print").with_handler(stub("print")),
        CommandDeclaration::new("closeWindow", "Close Window").with_handler(stub("closeWindow")),
        CommandDeclaration::new("quit", "Quit").with_handler(stub("quit")),
        CommandDeclaration::new("copy", "Copy").with_handler(stub("copy")),
        CommandDeclaration::new("cut", "Cut").with_handler(stub("cut")),
        CommandDeclaration::new("paste", "Paste").with_handler(stub("paste")),
        CommandDeclaration::new("selectAll", "Select all").with_handler(stub("selectAll")),
        CommandDeclaration::new("toggleSidebar", "Toggle sidebar")
            .with_handler(stub("toggleSidebar")),
        CommandDeclaration::new("toggleNoteList", "Toggle note list")
            .with_handler(stub("toggleNoteList")),
        CommandDeclaration::new("toggleVisiblePanes", "Toggle editor layout")
            .with_handler(stub("toggleVisiblePanes")),
        CommandDeclaration::new("duplicateNote", "Duplicate")
            .with_enabled(needs_selection)
            .with_handler(stub("duplicateNote")),
        CommandDeclaration::new("setTags", "Tags")
            .with_enabled(needs_selection)
            .with_handler(stub("setTags")),
        CommandDeclaration::new("deleteNote", "Delete")
            .with_enabled(needs_selection)
            .with_handler(stub("deleteNote")),
        CommandDeclaration::new("settings", "Options").with_handler(stub("settings")),
        CommandDeclaration::new("noteAttachments", "Note attachments...")
            .with_handler(stub("noteAttachments")),
        CommandDeclaration::new("about", "About Jot").with_handler(stub("about")),
        CommandDeclaration::new("import", "Import").with_handler(stub("import")),
        CommandDeclaration::new("export", "Export").with_handler(stub("export")),
    ]
}
