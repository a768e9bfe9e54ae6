//! Template assembler.
//!
//! Composes the static skeleton with the item factory's output and the
//! dynamic section builders, applies platform and route conditioning,
//! merges extension contributions and strips dead separators.

use crate::menu::descriptor::{Gated, MenuItemDescriptor, RootId, RootMenu};
use crate::menu::factory::ItemFactory;
use crate::menu::sections::{self, SortKind};
use crate::menu::MenuError;
use crate::platform::Platform;
use crate::services::{
    AcceleratorResolver, CommandRegistry, ExtensionHost, FormatRegistry, SettingValue,
    SettingsStore, UrlOpener,
};
use crate::state::{keys, AppState, Route};
use std::collections::HashMap;
use std::sync::Arc;

/// Every command id the static skeleton may reference, across all
/// platforms. The factory must resolve each of these; a miss is a
/// build-time inconsistency.
pub const STATIC_COMMANDS: &[&str] = &[
    "newNote",
    "newTodo",
    "newFolder",
    "synchronize",
    "print",
    "closeWindow",
    "quit",
    "copy",
    "cut",
    "paste",
    "selectAll",
    "toggleSidebar",
    "toggleNoteList",
    "toggleVisiblePanes",
    "duplicateNote",
    "setTags",
    "deleteNote",
    "settings",
    "noteAttachments",
    "about",
];

const HELP_WEBSITE_URL: &str = "https://jotapp.org/help/";
const HELP_FORUM_URL: &str = "https://discourse.jotapp.org/";

/// Assembles the full descriptor template from live collaborator state.
pub struct TemplateAssembler {
    commands: Arc<dyn CommandRegistry>,
    accelerators: Arc<dyn AcceleratorResolver>,
    settings: Arc<dyn SettingsStore>,
    formats: Arc<dyn FormatRegistry>,
    extensions: Arc<dyn ExtensionHost>,
    shell: Arc<dyn UrlOpener>,
    platform: Platform,
}

impl TemplateAssembler {
    /// Create an assembler over the given collaborators.
    pub fn new(
        commands: Arc<dyn CommandRegistry>,
        accelerators: Arc<dyn AcceleratorResolver>,
        settings: Arc<dyn SettingsStore>,
        formats: Arc<dyn FormatRegistry>,
        extensions: Arc<dyn ExtensionHost>,
        shell: Arc<dyn UrlOpener>,
        platform: Platform,
    ) -> Self {
        Self {
            commands,
            accelerators,
            settings,
            formats,
            extensions,
            shell,
            platform,
        }
    }

    /// The platform this assembler targets.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Assemble the ordered root menus for the given state.
    ///
    /// Pure with respect to the installed menu: the caller builds and
    /// installs the result through the toolkit.
    pub fn assemble(&self, state: &AppState) -> Result<Vec<RootMenu>, MenuError> {
        let factory = ItemFactory::new(&*self.commands, &*self.accelerators);

        // Off the main screen only a degraded-but-safe menu is shown so
        // the application always remains closeable.
        if state.route != Route::Main {
            return self.collapsed(&factory, state);
        }

        let items = factory.build(STATIC_COMMANDS, state)?;
        let is_mac = self.platform.is_mac();

        let mut roots = Vec::new();
        if is_mac {
            roots.push(self.mac_app_root(&items)?);
        }

        let import_menu =
            MenuItemDescriptor::submenu("Import", sections::import_items(&*self.formats));
        let export_menu =
            MenuItemDescriptor::submenu("Export all", sections::export_items(&*self.formats));

        let file_items = if is_mac {
            self.root_menu_file_macos(&items, import_menu, export_menu)?
        } else {
            self.root_menu_file(&items, import_menu, export_menu)?
        };
        roots.push(RootMenu {
            id: RootId::File,
            label: "File".into(),
            items: file_items,
        });

        roots.push(RootMenu {
            id: RootId::Edit,
            label: "Edit".into(),
            items: vec![
                item(&items, "copy")?,
                item(&items, "cut")?,
                item(&items, "paste")?,
                MenuItemDescriptor::separator(),
                item(&items, "selectAll")?,
            ],
        });

        roots.push(RootMenu {
            id: RootId::View,
            label: "View".into(),
            items: vec![
                item(&items, "toggleSidebar")?,
                item(&items, "toggleNoteList")?,
                item(&items, "toggleVisiblePanes")?,
                MenuItemDescriptor::separator(),
                MenuItemDescriptor::submenu(
                    self.settings.metadata_label(keys::NOTES_SORT_FIELD),
                    sections::sort_order_items(SortKind::Notes, &self.settings, state),
                ),
                MenuItemDescriptor::submenu(
                    self.settings.metadata_label(keys::FOLDERS_SORT_FIELD),
                    sections::sort_order_items(SortKind::Folders, &self.settings, state),
                ),
                self.display_toggle(keys::SHOW_NOTE_COUNTS, state.show_note_counts),
                self.display_toggle(keys::UNCOMPLETED_TODOS_ON_TOP, state.uncompleted_todos_on_top),
                self.display_toggle(keys::SHOW_COMPLETED_TODOS, state.show_completed_todos),
            ],
        });

        roots.push(RootMenu {
            id: RootId::Note,
            label: "Note".into(),
            items: vec![
                item(&items, "duplicateNote")?,
                item(&items, "setTags")?,
                MenuItemDescriptor::separator(),
                item(&items, "deleteNote")?,
            ],
        });

        roots.push(RootMenu {
            id: RootId::Tools,
            label: "Tools".into(),
            items: vec![
                // Settings live in the app-identity menu on macOS.
                Gated::when(!is_mac, item(&items, "settings")?).resolve(),
                item(&items, "noteAttachments")?,
            ],
        });

        let website = self.shell.clone();
        let forum = self.shell.clone();
        roots.push(RootMenu {
            id: RootId::Help,
            label: "Help".into(),
            items: vec![
                MenuItemDescriptor::command("helpWebsite", "Website and documentation")
                    .with_callback(move || website.open(HELP_WEBSITE_URL)),
                MenuItemDescriptor::command("helpForum", "Jot Forum")
                    .with_callback(move || forum.open(HELP_FORUM_URL)),
                Gated::when(!is_mac, MenuItemDescriptor::separator()).resolve(),
                Gated::when(!is_mac, item(&items, "about")?).resolve(),
            ],
        });

        self.merge_contributions(&mut roots, &factory, state);

        for root in &mut roots {
            strip_hidden_separators(&mut root.items);
        }

        Ok(roots)
    }

    /// The minimal template shown off the main screen.
    fn collapsed(
        &self,
        factory: &ItemFactory<'_>,
        state: &AppState,
    ) -> Result<Vec<RootMenu>, MenuError> {
        Ok(vec![RootMenu {
            id: RootId::File,
            label: "File".into(),
            items: vec![factory.build_one("quit", state)?],
        }])
    }

    fn mac_app_root(
        &self,
        items: &HashMap<String, MenuItemDescriptor>,
    ) -> Result<RootMenu, MenuError> {
        Ok(RootMenu {
            id: RootId::MacOsApp,
            label: "Jot".into(),
            items: vec![
                item(items, "about")?,
                MenuItemDescriptor::separator(),
                item(items, "settings")?,
                MenuItemDescriptor::separator(),
                item(items, "quit")?,
            ],
        })
    }

    fn root_menu_file(
        &self,
        items: &HashMap<String, MenuItemDescriptor>,
        import_menu: MenuItemDescriptor,
        export_menu: MenuItemDescriptor,
    ) -> Result<Vec<MenuItemDescriptor>, MenuError> {
        Ok(vec![
            item(items, "newNote")?,
            item(items, "newTodo")?,
            item(items, "newFolder")?,
            MenuItemDescriptor::separator(),
            import_menu,
            export_menu,
            MenuItemDescriptor::separator(),
            item(items, "synchronize")?,
            MenuItemDescriptor::separator(),
            item(items, "print")?,
            MenuItemDescriptor::separator(),
            item(items, "quit")?,
        ])
    }

    fn root_menu_file_macos(
        &self,
        items: &HashMap<String, MenuItemDescriptor>,
        import_menu: MenuItemDescriptor,
        export_menu: MenuItemDescriptor,
    ) -> Result<Vec<MenuItemDescriptor>, MenuError> {
        Ok(vec![
            item(items, "newNote")?,
            item(items, "newTodo")?,
            item(items, "newFolder")?,
            MenuItemDescriptor::separator(),
            import_menu,
            export_menu,
            MenuItemDescriptor::separator(),
            item(items, "synchronize")?,
            MenuItemDescriptor::separator(),
            item(items, "print")?,
            MenuItemDescriptor::separator(),
            item(items, "closeWindow")?,
        ])
    }

    fn display_toggle(&self, key: &'static str, checked: bool) -> MenuItemDescriptor {
        let store = self.settings.clone();
        MenuItemDescriptor::checkbox(key, self.settings.metadata_label(key), checked)
            .with_callback(move || {
                let flipped = !store.get(key).as_bool();
                store.set(key, SettingValue::Bool(flipped));
            })
    }

    /// Append extension contributions to their target roots.
    ///
    /// The generic plugin list is lenient: an unknown parent falls back
    /// to Tools with a warning. View-info contributions declare an
    /// explicit location enum and are dropped with an error instead.
    fn merge_contributions(
        &self,
        roots: &mut [RootMenu],
        factory: &ItemFactory<'_>,
        state: &AppState,
    ) {
        for contribution in self.extensions.contributed_menu_items() {
            let target = match RootId::from_key(&contribution.parent) {
                Some(root) if root_index(roots, root).is_some() => root,
                _ => {
                    log::warn!(
                        "extension menu item targets unknown root `{}`, falling back to tools",
                        contribution.parent
                    );
                    RootId::Tools
                }
            };
            if let Some(index) = root_index(roots, target) {
                roots[index].items.push(contribution.item);
            }
        }

        for (target, item) in sections::view_info_items(&*self.extensions, factory, state) {
            match root_index(roots, target) {
                Some(index) => roots[index].items.push(item),
                None => {
                    log::error!(
                        "dropping extension view contribution: root `{}` is not in the template",
                        target.key()
                    );
                }
            }
        }
    }
}

fn item(
    items: &HashMap<String, MenuItemDescriptor>,
    id: &str,
) -> Result<MenuItemDescriptor, MenuError> {
    items
        .get(id)
        .cloned()
        .ok_or_else(|| MenuError::UnknownCommand(id.to_string()))
}

fn root_index(roots: &[RootMenu], id: RootId) -> Option<usize> {
    roots.iter().position(|r| r.id == id)
}

/// Remove every separator whose `visible` flag is false, recursively.
///
/// The host toolkit renders separators regardless of a hidden flag, so
/// the dummies left by platform exclusion must be removed outright.
pub fn strip_hidden_separators(items: &mut Vec<MenuItemDescriptor>) {
    items.retain(|item| !(item.is_separator() && !item.visible));
    for item in items.iter_mut() {
        strip_hidden_separators(&mut item.children);
    }
}
