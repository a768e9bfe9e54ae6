//! Menu descriptor data model.
//!
//! Descriptors are value objects: every assembly run rebuilds the full
//! tree from scratch and the previous tree is discarded once installed.

use crate::services::{CommandArgs, CommandRegistry};
use std::fmt;
use std::sync::Arc;

/// What a menu entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A plain clickable item.
    Normal,
    /// A checkable item.
    Checkbox,
    /// A visual separator.
    Separator,
    /// An item holding a child menu.
    Submenu,
}

/// The invocation attached to a leaf item.
#[derive(Clone)]
pub enum MenuAction {
    /// A command id dispatched through the command registry.
    Command {
        /// The command identifier.
        id: String,
        /// Positional dispatch arguments.
        args: CommandArgs,
    },
    /// An inline side-effecting closure, e.g. "open external link".
    Callback(Arc<dyn Fn() + Send + Sync>),
}

impl MenuAction {
    /// Shorthand for a command dispatch without arguments.
    pub fn command(id: impl Into<String>) -> Self {
        MenuAction::Command {
            id: id.into(),
            args: Vec::new(),
        }
    }

    /// The command id, if this is a command dispatch.
    pub fn command_id(&self) -> Option<&str> {
        match self {
            MenuAction::Command { id, .. } => Some(id),
            MenuAction::Callback(_) => None,
        }
    }

    /// Run the action: commands dispatch through the registry, inline
    /// callbacks run directly.
    pub fn invoke(&self, commands: &dyn CommandRegistry) {
        match self {
            MenuAction::Command { id, args } => commands.execute(id, args.clone()),
            MenuAction::Callback(f) => f(),
        }
    }
}

// Structural equality only: two callbacks compare equal regardless of
// the captured closure, so assembly determinism stays testable.
impl PartialEq for MenuAction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                MenuAction::Command { id: a, args: x },
                MenuAction::Command { id: b, args: y },
            ) => a == b && x == y,
            (MenuAction::Callback(_), MenuAction::Callback(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Command { id, args } => f
                .debug_struct("Command")
                .field("id", id)
                .field("args", args)
                .finish(),
            MenuAction::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// A data-only description of one menu entry, not yet installed into
/// any native structure.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemDescriptor {
    /// Stable identifier, unique within the assembled template.
    ///
    /// Absent for pure-display entries such as separators.
    pub id: Option<String>,
    /// Localized display label.
    pub label: String,
    /// Kind of entry.
    pub kind: ItemKind,
    /// Platform-formatted shortcut text.
    pub accelerator: Option<String>,
    /// Whether the item is clickable.
    pub enabled: bool,
    /// Whether a checkbox item is checked.
    pub checked: bool,
    /// Assembly-only visibility; never persisted into the installed
    /// structure because the host toolkit renders hidden separators
    /// regardless of the flag.
    pub visible: bool,
    /// Child items, for submenus.
    pub children: Vec<MenuItemDescriptor>,
    /// The invocation run on click.
    pub action: Option<MenuAction>,
}

impl MenuItemDescriptor {
    /// Create a command-backed item.
    pub fn command(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            action: Some(MenuAction::command(id.clone())),
            id: Some(id),
            label: label.into(),
            kind: ItemKind::Normal,
            accelerator: None,
            enabled: true,
            checked: false,
            visible: true,
            children: Vec::new(),
        }
    }

    /// Create a checkbox item.
    pub fn checkbox(id: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self {
            id: Some(id.into()),
            label: label.into(),
            kind: ItemKind::Checkbox,
            accelerator: None,
            enabled: true,
            checked,
            visible: true,
            children: Vec::new(),
            action: None,
        }
    }

    /// Create a separator.
    pub fn separator() -> Self {
        Self {
            id: None,
            label: String::new(),
            kind: ItemKind::Separator,
            accelerator: None,
            enabled: false,
            checked: false,
            visible: true,
            children: Vec::new(),
            action: None,
        }
    }

    /// Create an invisible dummy separator.
    ///
    /// Stands in positionally for a platform-excluded item and is
    /// removed by the assembler's cleanup pass.
    pub fn hidden_separator() -> Self {
        let mut sep = Self::separator();
        sep.visible = false;
        sep
    }

    /// Create a submenu item.
    pub fn submenu(label: impl Into<String>, children: Vec<MenuItemDescriptor>) -> Self {
        Self {
            id: None,
            label: label.into(),
            kind: ItemKind::Submenu,
            accelerator: None,
            enabled: true,
            checked: false,
            visible: true,
            children,
            action: None,
        }
    }

    /// Set the accelerator text.
    pub fn with_accelerator(mut self, accelerator: Option<String>) -> Self {
        self.accelerator = accelerator;
        self
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the click action.
    pub fn with_action(mut self, action: MenuAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Set an inline callback action.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.action = Some(MenuAction::Callback(Arc::new(callback)));
        self
    }

    /// Whether this is a separator.
    pub fn is_separator(&self) -> bool {
        self.kind == ItemKind::Separator
    }
}

/// Platform-conditional inclusion of a descriptor.
///
/// Non-matching platforms keep the structural slot occupied by an
/// invisible dummy separator; omitting the slot outright breaks
/// sibling ordering in some host-toolkit versions.
pub enum Gated {
    /// The descriptor is included as-is.
    Visible(MenuItemDescriptor),
    /// The slot is held by an invisible dummy separator.
    Hidden,
}

impl Gated {
    /// Gate a descriptor on a platform predicate.
    pub fn when(condition: bool, descriptor: MenuItemDescriptor) -> Self {
        if condition {
            Gated::Visible(descriptor)
        } else {
            Gated::Hidden
        }
    }

    /// Resolve to the descriptor placed at this structural position.
    pub fn resolve(self) -> MenuItemDescriptor {
        match self {
            Gated::Visible(descriptor) => descriptor,
            Gated::Hidden => MenuItemDescriptor::hidden_separator(),
        }
    }
}

/// A named top-level entry of the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootId {
    /// The File menu.
    File,
    /// The Edit menu.
    Edit,
    /// The View menu.
    View,
    /// The Note menu.
    Note,
    /// The Tools menu.
    Tools,
    /// The Help menu.
    Help,
    /// The macOS app-identity menu.
    MacOsApp,
}

impl RootId {
    /// Stable string key of the root, as used by extension manifests.
    pub fn key(self) -> &'static str {
        match self {
            RootId::File => "file",
            RootId::Edit => "edit",
            RootId::View => "view",
            RootId::Note => "note",
            RootId::Tools => "tools",
            RootId::Help => "help",
            RootId::MacOsApp => "macOsApp",
        }
    }

    /// Parse a root key, e.g. from an extension manifest.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "file" => Some(RootId::File),
            "edit" => Some(RootId::Edit),
            "view" => Some(RootId::View),
            "note" => Some(RootId::Note),
            "tools" => Some(RootId::Tools),
            "help" => Some(RootId::Help),
            "macOsApp" => Some(RootId::MacOsApp),
            _ => None,
        }
    }
}

/// One top-level menu with its ordered submenu.
#[derive(Debug, Clone, PartialEq)]
pub struct RootMenu {
    /// Which root this is.
    pub id: RootId,
    /// Display label of the root.
    pub label: String,
    /// Ordered items of the root's submenu.
    pub items: Vec<MenuItemDescriptor>,
}
