//! Service interfaces the menu engine consumes.
//!
//! The engine never owns command execution, keybindings, settings,
//! format handlers or extensions; it talks to them through the traits
//! below. A single process-wide instance of each collaborator is wired
//! at startup and passed by reference into the assembler/reconciler.

use crate::menu::descriptor::MenuItemDescriptor;
use crate::state::AppState;
use indexmap::IndexMap;
use std::sync::Arc;

/// Positional arguments passed along with a command dispatch.
pub type CommandArgs = Vec<String>;

/// Static metadata of a registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMetadata {
    /// Localized menu label.
    pub label: String,
}

/// The command-execution and command-enablement registry.
pub trait CommandRegistry: Send + Sync {
    /// Metadata for a command id, or `None` if the id is unknown.
    fn metadata(&self, id: &str) -> Option<CommandMetadata>;

    /// Whether the command may currently run.
    fn is_enabled(&self, id: &str, state: &AppState) -> bool;

    /// Dispatch the command.
    fn execute(&self, id: &str, args: CommandArgs);
}

/// The keybinding/accelerator resolver.
pub trait AcceleratorResolver: Send + Sync {
    /// Platform-formatted shortcut text for a command, if any is bound.
    fn accelerator_for(&self, id: &str) -> Option<String>;
}

/// A typed setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean setting.
    Bool(bool),
    /// Integer setting.
    Int(i64),
    /// Text setting (including enumerated values).
    Text(String),
}

impl SettingValue {
    /// Read as boolean, defaulting to `false`.
    pub fn as_bool(&self) -> bool {
        match self {
            SettingValue::Bool(v) => *v,
            SettingValue::Int(v) => *v != 0,
            SettingValue::Text(_) => false,
        }
    }

    /// Read as integer, defaulting to `0`.
    pub fn as_int(&self) -> i64 {
        match self {
            SettingValue::Int(v) => *v,
            SettingValue::Bool(v) => *v as i64,
            SettingValue::Text(_) => 0,
        }
    }

    /// Read as text, defaulting to the empty string.
    pub fn as_text(&self) -> String {
        match self {
            SettingValue::Text(v) => v.clone(),
            SettingValue::Bool(v) => v.to_string(),
            SettingValue::Int(v) => v.to_string(),
        }
    }
}

/// The settings store.
pub trait SettingsStore: Send + Sync {
    /// Current value of a setting.
    fn get(&self, key: &str) -> SettingValue;

    /// Write a setting.
    fn set(&self, key: &str, value: SettingValue);

    /// Add `delta` to an integer setting.
    fn incr(&self, key: &str, delta: i64);

    /// Enumerated options of a setting, in registration order.
    fn enum_options(&self, key: &str) -> IndexMap<String, String>;

    /// Localized label of a setting.
    fn metadata_label(&self, key: &str) -> String;
}

/// Whether a format module imports or exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatModuleKind {
    /// The module reads foreign data into the app.
    Importer,
    /// The module writes app data out.
    Exporter,
}

/// Input source an importer supports.
///
/// The source decides which file-picker mode the import action opens,
/// so each (module, source) pair surfaces as its own menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportSource {
    /// Import from a single file.
    File,
    /// Import from a directory tree.
    Directory,
}

impl ImportSource {
    /// Stable key used in item identifiers and command args.
    pub fn key(self) -> &'static str {
        match self {
            ImportSource::File => "file",
            ImportSource::Directory => "directory",
        }
    }

    /// Human-readable label for menu text.
    pub fn label(self) -> &'static str {
        match self {
            ImportSource::File => "File",
            ImportSource::Directory => "Directory",
        }
    }
}

/// One installed import or export format handler.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatModule {
    /// Importer or exporter.
    pub kind: FormatModuleKind,
    /// Short format key, e.g. `"jex"`.
    pub format: String,
    /// Supported input sources (importers only).
    pub sources: Vec<ImportSource>,
    /// Whether an exporter covers the full note archive.
    ///
    /// Only archive exporters appear in the export-all list; the rest
    /// are partial exporters surfaced elsewhere.
    pub is_note_archive: bool,
    /// File extensions handled by the format.
    pub file_extensions: Vec<String>,
    /// Human-readable description used as menu text.
    pub description: String,
}

/// The import/export format-handler registry.
pub trait FormatRegistry: Send + Sync {
    /// All installed modules.
    fn list_modules(&self) -> Vec<FormatModule>;
}

/// Target location an extension view declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLocation {
    /// Inline context menus; never part of the menu bar.
    Context,
    /// The File root menu.
    File,
    /// The Edit root menu.
    Edit,
    /// The View root menu.
    View,
    /// The Note root menu.
    Note,
    /// The Tools root menu.
    Tools,
    /// The Help root menu.
    Help,
}

impl ViewLocation {
    /// The root menu this location maps to, if it is a menu-bar location.
    pub fn root(self) -> Option<crate::menu::descriptor::RootId> {
        use crate::menu::descriptor::RootId;
        match self {
            ViewLocation::Context => None,
            ViewLocation::File => Some(RootId::File),
            ViewLocation::Edit => Some(RootId::Edit),
            ViewLocation::View => Some(RootId::View),
            ViewLocation::Note => Some(RootId::Note),
            ViewLocation::Tools => Some(RootId::Tools),
            ViewLocation::Help => Some(RootId::Help),
        }
    }
}

/// A pre-built menu item contributed by an extension.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuContribution {
    /// Free-form key of the target root menu, e.g. `"tools"`.
    pub parent: String,
    /// The contributed item.
    pub item: MenuItemDescriptor,
}

/// An extension view declaration with an explicit location.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewInfo {
    /// Where the view integrates.
    pub location: ViewLocation,
    /// Command that opens the view; its descriptor is built on demand.
    pub command: String,
}

/// The extension/plugin registry.
pub trait ExtensionHost: Send + Sync {
    /// Generic menu item contributions.
    fn contributed_menu_items(&self) -> Vec<MenuContribution>;

    /// View declarations with an explicit location enum.
    fn contributed_view_infos(&self) -> Vec<ViewInfo>;
}

/// Opens external links in the system browser.
///
/// Leaf actions like "open documentation" capture this at assembly
/// time; the engine itself never shells out.
pub trait UrlOpener: Send + Sync {
    /// Open the given URL externally.
    fn open(&self, url: &str);
}

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback invoked when a change source fires.
pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// A source of change notifications (keymap, format registry).
pub trait ChangeNotifier: Send + Sync {
    /// Register a listener, returning its id.
    fn subscribe(&self, listener: ChangeListener) -> ListenerId;

    /// Remove a previously registered listener.
    fn unsubscribe(&self, id: ListenerId);
}
