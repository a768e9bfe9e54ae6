//! Shared in-memory stubs for the engine's collaborator traits.

use crate::menu::assembler::{TemplateAssembler, STATIC_COMMANDS};
use crate::menu::reconcile::StateReconciler;
use crate::menu::sections::{sort_field_item_id, sort_reverse_item_id, SortKind};
use crate::menu::sync::MenuSync;
use crate::platform::Platform;
use crate::services::{
    AcceleratorResolver, ChangeListener, ChangeNotifier, CommandArgs, CommandMetadata,
    CommandRegistry, ExtensionHost, FormatModule, FormatModuleKind, FormatRegistry, ImportSource,
    ListenerId, MenuContribution, SettingValue, SettingsStore, UrlOpener, ViewInfo,
};
use crate::state::{keys, AppState};
use crate::toolkit::{ItemFlags, MemoryToolkit, MenuHandle};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Commands whose enablement follows the note selection.
const SELECTION_COMMANDS: &[&str] = &["duplicateNote", "setTags", "deleteNote"];

/// Command registry stub with a fixed label table. Dispatches are
/// recorded for assertion.
pub(crate) struct StubCommands {
    labels: HashMap<String, String>,
    disabled: HashSet<String>,
    executed: Mutex<Vec<(String, CommandArgs)>>,
}

impl StubCommands {
    /// All static skeleton commands, with realistic labels.
    pub(crate) fn standard() -> Self {
        let labels = [
            ("newNote", "New note"),
            ("newTodo", "New to-do"),
            ("newFolder", "New notebook"),
            ("synchronize", "Synchronise"),
            ("print", "Print"),
            ("closeWindow", "Close Window"),
            ("quit", "Quit"),
            ("copy", "Copy"),
            ("cut", "Cut"),
            ("paste", "Paste"),
            ("selectAll", "Select all"),
            ("toggleSidebar", "Toggle sidebar"),
            ("toggleNoteList", "Toggle note list"),
            ("toggleVisiblePanes", "Toggle editor layout"),
            ("duplicateNote", "Duplicate"),
            ("setTags", "Tags"),
            ("deleteNote", "Delete"),
            ("settings", "Options"),
            ("noteAttachments", "Note attachments..."),
            ("about", "About Jot"),
        ]
        .into_iter()
        .map(|(id, label)| (id.to_string(), label.to_string()))
        .collect();
        Self {
            labels,
            disabled: HashSet::new(),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Every dispatch this registry has seen, in order.
    pub(crate) fn executed(&self) -> Vec<(String, CommandArgs)> {
        self.executed.lock().unwrap().clone()
    }

    /// Force a command to report as disabled.
    pub(crate) fn with_disabled(mut self, id: &str) -> Self {
        self.disabled.insert(id.to_string());
        self
    }

    /// Register an extra command.
    pub(crate) fn with_command(mut self, id: &str, label: &str) -> Self {
        self.labels.insert(id.to_string(), label.to_string());
        self
    }
}

impl CommandRegistry for StubCommands {
    fn metadata(&self, id: &str) -> Option<CommandMetadata> {
        self.labels.get(id).map(|label| CommandMetadata {
            label: label.clone(),
        })
    }

    fn is_enabled(&self, id: &str, state: &AppState) -> bool {
        if self.disabled.contains(id) {
            return false;
        }
        if SELECTION_COMMANDS.contains(&id) {
            return state.selected_note_count > 0;
        }
        true
    }

    fn execute(&self, id: &str, args: CommandArgs) {
        self.executed.lock().unwrap().push((id.to_string(), args));
    }
}

/// Accelerator resolver stub with mutable bindings.
pub(crate) struct StubKeymap {
    bindings: Mutex<HashMap<String, String>>,
}

impl StubKeymap {
    pub(crate) fn standard() -> Self {
        let bindings = [
            ("newNote", "Ctrl+N"),
            ("newTodo", "Ctrl+T"),
            ("synchronize", "Ctrl+S"),
            ("print", "Ctrl+P"),
            ("quit", "Ctrl+Q"),
            ("copy", "Ctrl+C"),
            ("cut", "Ctrl+X"),
            ("paste", "Ctrl+V"),
            ("selectAll", "Ctrl+A"),
        ]
        .into_iter()
        .map(|(id, accel)| (id.to_string(), accel.to_string()))
        .collect();
        Self {
            bindings: Mutex::new(bindings),
        }
    }

    /// Rebind a command. Callers fire the keymap notifier themselves.
    pub(crate) fn set(&self, id: &str, accelerator: &str) {
        self.bindings
            .lock()
            .unwrap()
            .insert(id.to_string(), accelerator.to_string());
    }
}

impl AcceleratorResolver for StubKeymap {
    fn accelerator_for(&self, id: &str) -> Option<String> {
        self.bindings.lock().unwrap().get(id).cloned()
    }
}

/// Settings store stub with enumerated options in registration order.
pub(crate) struct StubSettings {
    values: Mutex<HashMap<String, SettingValue>>,
    options: IndexMap<String, IndexMap<String, String>>,
    labels: HashMap<String, String>,
}

impl StubSettings {
    pub(crate) fn standard() -> Self {
        let mut options = IndexMap::new();
        options.insert(
            keys::NOTES_SORT_FIELD.to_string(),
            [
                ("user_updated_time", "Updated date"),
                ("user_created_time", "Created date"),
                ("title", "Title"),
                ("order", "Custom order"),
            ]
            .into_iter()
            .map(|(v, l)| (v.to_string(), l.to_string()))
            .collect(),
        );
        options.insert(
            keys::FOLDERS_SORT_FIELD.to_string(),
            [
                ("title", "Title"),
                ("last_note_user_updated_time", "Last updated note"),
            ]
            .into_iter()
            .map(|(v, l)| (v.to_string(), l.to_string()))
            .collect(),
        );

        let labels = [
            (keys::NOTES_SORT_FIELD, "Sort notes by"),
            (keys::NOTES_SORT_REVERSE, "Reverse sort order"),
            (keys::FOLDERS_SORT_FIELD, "Sort notebooks by"),
            (keys::FOLDERS_SORT_REVERSE, "Reverse sort order"),
            (keys::SHOW_NOTE_COUNTS, "Show note counts"),
            (keys::UNCOMPLETED_TODOS_ON_TOP, "Uncompleted to-dos on top"),
            (keys::SHOW_COMPLETED_TODOS, "Show completed to-dos"),
            (keys::LAYOUT_BUTTON_SEQUENCE, "Layout button sequence"),
        ]
        .into_iter()
        .map(|(k, l)| (k.to_string(), l.to_string()))
        .collect();

        let values = [
            (
                keys::NOTES_SORT_FIELD,
                SettingValue::Text("user_updated_time".into()),
            ),
            (keys::NOTES_SORT_REVERSE, SettingValue::Bool(false)),
            (keys::FOLDERS_SORT_FIELD, SettingValue::Text("title".into())),
            (keys::FOLDERS_SORT_REVERSE, SettingValue::Bool(false)),
            (keys::SHOW_NOTE_COUNTS, SettingValue::Bool(true)),
            (keys::UNCOMPLETED_TODOS_ON_TOP, SettingValue::Bool(true)),
            (keys::SHOW_COMPLETED_TODOS, SettingValue::Bool(true)),
            (keys::LAYOUT_BUTTON_SEQUENCE, SettingValue::Int(0)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            values: Mutex::new(values),
            options,
            labels,
        }
    }
}

impl SettingsStore for StubSettings {
    fn get(&self, key: &str) -> SettingValue {
        self.values
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or(SettingValue::Bool(false))
    }

    fn set(&self, key: &str, value: SettingValue) {
        self.values.lock().unwrap().insert(key.to_string(), value);
    }

    fn incr(&self, key: &str, delta: i64) {
        let current = self.get(key).as_int();
        self.set(key, SettingValue::Int(current + delta));
    }

    fn enum_options(&self, key: &str) -> IndexMap<String, String> {
        self.options.get(key).cloned().unwrap_or_default()
    }

    fn metadata_label(&self, key: &str) -> String {
        self.labels
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Format registry stub with a mutable module table.
pub(crate) struct StubFormats {
    modules: Mutex<Vec<FormatModule>>,
}

impl StubFormats {
    /// The built-in format handlers an installation ships with.
    pub(crate) fn standard() -> Self {
        Self::custom(vec![
            FormatModule {
                kind: FormatModuleKind::Exporter,
                format: "jex".into(),
                sources: Vec::new(),
                is_note_archive: true,
                file_extensions: vec!["jex".into()],
                description: "Jot Export File".into(),
            },
            FormatModule {
                kind: FormatModuleKind::Exporter,
                format: "raw".into(),
                sources: Vec::new(),
                is_note_archive: true,
                file_extensions: Vec::new(),
                description: "Jot Export Directory".into(),
            },
            // Partial exporter: selected notes only, never in export-all.
            FormatModule {
                kind: FormatModuleKind::Exporter,
                format: "md".into(),
                sources: Vec::new(),
                is_note_archive: false,
                file_extensions: vec!["md".into()],
                description: "Markdown".into(),
            },
            FormatModule {
                kind: FormatModuleKind::Importer,
                format: "jex".into(),
                sources: vec![ImportSource::File],
                is_note_archive: true,
                file_extensions: vec!["jex".into()],
                description: "Jot Export File".into(),
            },
            FormatModule {
                kind: FormatModuleKind::Importer,
                format: "md".into(),
                sources: vec![ImportSource::File, ImportSource::Directory],
                is_note_archive: false,
                file_extensions: vec!["md".into()],
                description: "Markdown".into(),
            },
            FormatModule {
                kind: FormatModuleKind::Importer,
                format: "raw".into(),
                sources: vec![ImportSource::Directory],
                is_note_archive: true,
                file_extensions: Vec::new(),
                description: "Jot Export Directory".into(),
            },
        ])
    }

    pub(crate) fn custom(modules: Vec<FormatModule>) -> Self {
        Self {
            modules: Mutex::new(modules),
        }
    }

    /// Register a single-source file importer after construction.
    /// Callers fire the format notifier themselves.
    pub(crate) fn add_importer(&self, format: &str, description: &str) {
        self.modules.lock().unwrap().push(FormatModule {
            kind: FormatModuleKind::Importer,
            format: format.into(),
            sources: vec![ImportSource::File],
            is_note_archive: false,
            file_extensions: vec![format.into()],
            description: description.into(),
        });
    }
}

impl FormatRegistry for StubFormats {
    fn list_modules(&self) -> Vec<FormatModule> {
        self.modules.lock().unwrap().clone()
    }
}

/// Extension host stub.
#[derive(Default)]
pub(crate) struct StubExtensions {
    menu_items: Vec<MenuContribution>,
    view_infos: Vec<ViewInfo>,
}

impl StubExtensions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_menu_items(mut self, items: Vec<MenuContribution>) -> Self {
        self.menu_items = items;
        self
    }

    pub(crate) fn with_view_infos(mut self, infos: Vec<ViewInfo>) -> Self {
        self.view_infos = infos;
        self
    }
}

impl ExtensionHost for StubExtensions {
    fn contributed_menu_items(&self) -> Vec<MenuContribution> {
        self.menu_items.clone()
    }

    fn contributed_view_infos(&self) -> Vec<ViewInfo> {
        self.view_infos.clone()
    }
}

/// URL opener stub that goes nowhere.
pub(crate) struct NullShell;

impl UrlOpener for NullShell {
    fn open(&self, _url: &str) {}
}

/// Change notifier stub with synchronous dispatch.
#[derive(Default)]
pub(crate) struct StubNotifier {
    listeners: Mutex<HashMap<u64, ChangeListener>>,
    next_id: AtomicU64,
}

impl StubNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Invoke every registered listener.
    pub(crate) fn fire(&self) {
        let listeners: Vec<ChangeListener> =
            self.listeners.lock().unwrap().values().cloned().collect();
        for listener in listeners {
            listener();
        }
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }
}

impl ChangeNotifier for StubNotifier {
    fn subscribe(&self, listener: ChangeListener) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().insert(id, listener);
        ListenerId(id)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.lock().unwrap().remove(&id.0);
    }
}

/// Assembler over the standard stub set.
pub(crate) fn assembler_for(platform: Platform) -> TemplateAssembler {
    assembler_with_extensions(platform, StubExtensions::new())
}

/// Assembler over the standard stub set plus custom extensions.
///
/// The command registry also knows `pluginPanel` so view-info tests can
/// contribute a resolvable command.
pub(crate) fn assembler_with_extensions(
    platform: Platform,
    extensions: StubExtensions,
) -> TemplateAssembler {
    TemplateAssembler::new(
        Arc::new(StubCommands::standard().with_command("pluginPanel", "Plugin panel")),
        Arc::new(StubKeymap::standard()),
        Arc::new(StubSettings::standard()),
        Arc::new(StubFormats::standard()),
        Arc::new(extensions),
        Arc::new(NullShell),
        platform,
    )
}

/// Reconciler over the standard stub set.
pub(crate) fn reconciler() -> StateReconciler {
    StateReconciler::new(
        Arc::new(StubCommands::standard()),
        Arc::new(StubSettings::standard()),
    )
}

/// Snapshot every flag the engine addresses, for idempotence checks.
pub(crate) fn snapshot_flags(handle: &dyn MenuHandle) -> BTreeMap<String, ItemFlags> {
    let mut ids: Vec<String> = STATIC_COMMANDS.iter().map(|id| id.to_string()).collect();
    let settings = StubSettings::standard();
    for kind in [SortKind::Notes, SortKind::Folders] {
        for (value, _label) in settings.enum_options(kind.field_key()) {
            ids.push(sort_field_item_id(kind, &value));
        }
        ids.push(sort_reverse_item_id(kind));
    }
    ids.push(keys::SHOW_NOTE_COUNTS.into());
    ids.push(keys::UNCOMPLETED_TODOS_ON_TOP.into());
    ids.push(keys::SHOW_COMPLETED_TODOS.into());

    ids.into_iter()
        .filter_map(|id| handle.item_flags(&id).map(|flags| (id, flags)))
        .collect()
}

/// Fully wired [`MenuSync`] over the stub set, with direct access to
/// the stubs that drive rebuilds.
pub(crate) struct SyncFixture {
    pub(crate) sync: Arc<MenuSync>,
    pub(crate) commands: Arc<StubCommands>,
    pub(crate) toolkit: Arc<MemoryToolkit>,
    pub(crate) keymap: Arc<StubKeymap>,
    pub(crate) formats: Arc<StubFormats>,
    pub(crate) keymap_events: Arc<StubNotifier>,
    pub(crate) format_events: Arc<StubNotifier>,
}

impl SyncFixture {
    pub(crate) fn new(platform: Platform) -> Self {
        let commands = Arc::new(StubCommands::standard());
        let keymap = Arc::new(StubKeymap::standard());
        let settings = Arc::new(StubSettings::standard());
        let formats = Arc::new(StubFormats::standard());
        let toolkit = Arc::new(MemoryToolkit::new());
        let keymap_events = Arc::new(StubNotifier::new());
        let format_events = Arc::new(StubNotifier::new());

        let assembler = TemplateAssembler::new(
            commands.clone(),
            keymap.clone(),
            settings.clone(),
            formats.clone(),
            Arc::new(StubExtensions::new()),
            Arc::new(NullShell),
            platform,
        );
        let reconciler = StateReconciler::new(commands.clone(), settings);
        let sync = Arc::new(MenuSync::new(
            assembler,
            reconciler,
            toolkit.clone(),
            keymap_events.clone(),
            format_events.clone(),
            AppState::default(),
        ));

        Self {
            sync,
            commands,
            toolkit,
            keymap,
            formats,
            keymap_events,
            format_events,
        }
    }
}
