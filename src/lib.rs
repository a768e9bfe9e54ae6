#![warn(missing_docs)]

//! Native menu bar synthesis and state synchronization for the Jot
//! note-taking app.
//!
//! The engine assembles a data-only menu template from the application
//! state and its collaborator services, installs it through a host
//! toolkit seam, and keeps enabled/checked flags reconciled as state
//! changes.

pub use jot_core as core;
pub use jot_services as services;

/// A "prelude" for consumers of the menu engine.
///
/// Importing this module brings into scope the types needed to wire
/// the engine into an application.
///
/// ```rust
/// use jot_menubar::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::menu::{
        Gated, ItemKind, MenuAction, MenuError, MenuItemDescriptor, MenuSync, RootId, RootMenu,
        StateReconciler, TemplateAssembler,
    };
    pub use crate::core::platform::Platform;
    pub use crate::core::services::{
        AcceleratorResolver, ChangeNotifier, CommandRegistry, ExtensionHost, FormatModule,
        FormatModuleKind, FormatRegistry, ImportSource, SettingValue, SettingsStore, UrlOpener,
    };
    pub use crate::core::state::{AppState, Route};
    pub use crate::core::toolkit::{MemoryToolkit, MenuHandle, MenuToolkit};

    pub use crate::services::commands::{standard_declarations, CommandDeclaration, CommandService};
    pub use crate::services::dialogs::{BusyGuard, DialogService};
    pub use crate::services::interop::InteropService;
    pub use crate::services::keymap::{Accelerator, KeymapService};
    pub use crate::services::plugins::{PluginContribution, PluginStore};
    pub use crate::services::settings::{SettingMetadata, SettingsService};
    pub use crate::services::shell::SystemShell;
}
