//! Dynamic section builders.
//!
//! Three independent builders produce ordered item lists from live
//! external data: sort-order checkboxes from enumerated settings,
//! import/export entries from the format registry, and
//! extension-contributed items from the plugin registry.

use crate::menu::descriptor::{MenuItemDescriptor, RootId};
use crate::menu::factory::ItemFactory;
use crate::services::{
    ExtensionHost, FormatModuleKind, FormatRegistry, SettingValue, SettingsStore,
};
use crate::state::{keys, AppState};
use std::sync::Arc;

/// Entity kind a sort-order section controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// The note list.
    Notes,
    /// The notebook list.
    Folders,
}

impl SortKind {
    /// Stable key used in item identifiers.
    pub fn key(self) -> &'static str {
        match self {
            SortKind::Notes => "notes",
            SortKind::Folders => "folders",
        }
    }

    /// Settings key of the enumerated sort field.
    pub fn field_key(self) -> &'static str {
        match self {
            SortKind::Notes => keys::NOTES_SORT_FIELD,
            SortKind::Folders => keys::FOLDERS_SORT_FIELD,
        }
    }

    /// Settings key of the reverse flag.
    pub fn reverse_key(self) -> &'static str {
        match self {
            SortKind::Notes => keys::NOTES_SORT_REVERSE,
            SortKind::Folders => keys::FOLDERS_SORT_REVERSE,
        }
    }
}

/// Identifier of a sort-field checkbox.
pub fn sort_field_item_id(kind: SortKind, field: &str) -> String {
    format!("sort:{}:{}", kind.key(), field)
}

/// Identifier of a reverse checkbox.
pub fn sort_reverse_item_id(kind: SortKind) -> String {
    format!("sort:{}:reverse", kind.key())
}

/// Build the sort-order section for one entity kind.
///
/// One checkbox per enumerated field, emitted in the order the settings
/// registry enumerates them (registration order, never sorted), then a
/// separator and the trailing reverse checkbox. Click handlers write
/// the corresponding setting.
pub fn sort_order_items(
    kind: SortKind,
    settings: &Arc<dyn SettingsStore>,
    state: &AppState,
) -> Vec<MenuItemDescriptor> {
    let current = state.sort_order(kind);
    let mut items = Vec::new();

    for (value, label) in settings.enum_options(kind.field_key()) {
        let store = settings.clone();
        let field_key = kind.field_key();
        let field_value = value.clone();
        items.push(
            MenuItemDescriptor::checkbox(
                sort_field_item_id(kind, &value),
                label,
                current.field == value,
            )
            .with_callback(move || {
                store.set(field_key, SettingValue::Text(field_value.clone()));
            }),
        );
    }

    items.push(MenuItemDescriptor::separator());

    let store = settings.clone();
    let reverse_key = kind.reverse_key();
    items.push(
        MenuItemDescriptor::checkbox(
            sort_reverse_item_id(kind),
            settings.metadata_label(reverse_key),
            current.reverse,
        )
        .with_callback(move || {
            let flipped = !store.get(reverse_key).as_bool();
            store.set(reverse_key, SettingValue::Bool(flipped));
        }),
    );

    items
}

/// Identifier of an export-all entry.
pub fn export_item_id(format: &str) -> String {
    format!("export:{}", format)
}

/// Identifier of an import entry.
pub fn import_item_id(format: &str, source: crate::services::ImportSource) -> String {
    format!("import:{}:{}", format, source.key())
}

/// Build the export-all list from the format registry.
///
/// Only exporters flagged as full note archives are included; the rest
/// are partial/selective exporters surfaced elsewhere.
pub fn export_items(formats: &dyn FormatRegistry) -> Vec<MenuItemDescriptor> {
    formats
        .list_modules()
        .into_iter()
        .filter(|m| m.kind == FormatModuleKind::Exporter && m.is_note_archive)
        .map(|module| {
            let label = format!("{} - {}", module.format.to_uppercase(), module.description);
            MenuItemDescriptor::command(export_item_id(&module.format), label).with_action(
                crate::menu::descriptor::MenuAction::Command {
                    id: "export".into(),
                    args: vec![module.format.clone()],
                },
            )
        })
        .collect()
}

/// Build the import list from the format registry.
///
/// Importers contribute one item per supported source; the source
/// decides which file-picker mode the import action opens, so a module
/// with two sources yields two distinct items.
pub fn import_items(formats: &dyn FormatRegistry) -> Vec<MenuItemDescriptor> {
    let mut items = Vec::new();
    for module in formats.list_modules() {
        if module.kind != FormatModuleKind::Importer {
            continue;
        }
        let multi_source = module.sources.len() > 1;
        for source in &module.sources {
            let mut label = format!("{} - {}", module.format.to_uppercase(), module.description);
            if multi_source {
                label.push_str(&format!(" ({})", source.label()));
            }
            items.push(
                MenuItemDescriptor::command(import_item_id(&module.format, *source), label)
                    .with_action(crate::menu::descriptor::MenuAction::Command {
                        id: "import".into(),
                        args: vec![module.format.clone(), source.key().to_string()],
                    }),
            );
        }
    }
    items
}

/// Collect extension view-info contributions as (target root, item).
///
/// Inline-context declarations are handled elsewhere and skipped here.
/// A declaration whose command has no registered metadata is an
/// extension configuration error: it is reported and dropped so
/// assembly can continue.
pub fn view_info_items(
    extensions: &dyn ExtensionHost,
    factory: &ItemFactory<'_>,
    state: &AppState,
) -> Vec<(RootId, MenuItemDescriptor)> {
    let mut items = Vec::new();
    for info in extensions.contributed_view_infos() {
        let Some(root) = info.location.root() else {
            continue;
        };
        match factory.build_one(&info.command, state) {
            Ok(item) => items.push((root, item)),
            Err(err) => {
                log::error!(
                    "dropping extension view contribution `{}`: {}",
                    info.command,
                    err
                );
            }
        }
    }
    items
}
