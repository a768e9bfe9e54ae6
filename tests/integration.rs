//! End-to-end wiring of the production services into the menu engine,
//! against the in-memory toolkit.

use async_trait::async_trait;
use jot_menubar::prelude::*;
use jot_menubar::services::interop::ImportHandler;
use std::path::PathBuf;
use std::sync::Arc;

struct HeadlessDialogs;

#[async_trait]
impl DialogService for HeadlessDialogs {
    async fn open_file(&self, _extensions: &[String]) -> Option<PathBuf> {
        None
    }

    async fn open_directory(&self) -> Option<PathBuf> {
        None
    }

    async fn show_error(&self, _message: &str) {}

    fn set_busy(&self, _busy: bool) {}
}

struct Wiring {
    sync: Arc<MenuSync>,
    commands: Arc<CommandService>,
    toolkit: Arc<MemoryToolkit>,
    keymap: Arc<KeymapService>,
    settings: Arc<SettingsService>,
    interop: Arc<InteropService>,
    plugins: Arc<PluginStore>,
}

fn wire(platform: Platform) -> Wiring {
    let commands = Arc::new(CommandService::with_standard_declarations());
    let keymap = Arc::new(KeymapService::new(platform));
    let settings = Arc::new(SettingsService::new());
    let interop = Arc::new(InteropService::new(Arc::new(HeadlessDialogs)));
    let plugins = Arc::new(PluginStore::new());
    let toolkit = Arc::new(MemoryToolkit::new());

    let assembler = TemplateAssembler::new(
        commands.clone(),
        keymap.clone(),
        settings.clone(),
        interop.clone(),
        plugins.clone(),
        Arc::new(SystemShell::for_platform(platform)),
        platform,
    );
    let reconciler = StateReconciler::new(commands.clone(), settings.clone());
    let state = AppState::capture(Route::Main, 0, &*settings);
    let sync = Arc::new(MenuSync::new(
        assembler,
        reconciler,
        toolkit.clone(),
        keymap.clone(),
        interop.clone(),
        state,
    ));

    Wiring {
        sync,
        commands,
        toolkit,
        keymap,
        settings,
        interop,
        plugins,
    }
}

fn template_ids(toolkit: &MemoryToolkit) -> Vec<String> {
    fn collect(items: &[MenuItemDescriptor], out: &mut Vec<String>) {
        for item in items {
            if let Some(id) = &item.id {
                out.push(id.clone());
            }
            collect(&item.children, out);
        }
    }
    let mut ids = Vec::new();
    for root in toolkit.last_template() {
        collect(&root.items, &mut ids);
    }
    ids
}

fn find_accelerator(toolkit: &MemoryToolkit, id: &str) -> Option<String> {
    fn walk(items: &[MenuItemDescriptor], id: &str) -> Option<Option<String>> {
        for item in items {
            if item.id.as_deref() == Some(id) {
                return Some(item.accelerator.clone());
            }
            if let Some(found) = walk(&item.children, id) {
                return Some(found);
            }
        }
        None
    }
    toolkit
        .last_template()
        .iter()
        .find_map(|root| walk(&root.items, id))
        .flatten()
}

#[test]
fn production_services_assemble_a_complete_menu() {
    let wiring = wire(Platform::Linux);
    wiring.sync.start().unwrap();

    let ids = template_ids(&wiring.toolkit);
    // Static skeleton, dynamic sections and built-in formats all land.
    for expected in [
        "newNote",
        "quit",
        "sort:notes:user_updated_time",
        "sort:folders:reverse",
        "showNoteCounts",
        "export:jex",
        "export:raw",
        "import:md:file",
        "import:md:directory",
        "import:enex:file",
    ] {
        assert!(ids.contains(&expected.to_string()), "missing {}", expected);
    }
    // Partial exporters stay out of export-all.
    assert!(!ids.contains(&"export:pdf".to_string()));
}

#[test]
fn rebinding_a_key_rebuilds_with_new_accelerator_text() {
    let wiring = wire(Platform::Linux);
    wiring.sync.start().unwrap();
    assert_eq!(
        find_accelerator(&wiring.toolkit, "newNote").as_deref(),
        Some("Ctrl+N")
    );

    wiring
        .keymap
        .set_binding("newNote", Accelerator::parse("CmdOrCtrl+Shift+J").unwrap());

    assert_eq!(wiring.toolkit.install_count(), 2);
    assert_eq!(
        find_accelerator(&wiring.toolkit, "newNote").as_deref(),
        Some("Ctrl+Shift+J")
    );
}

#[test]
fn registering_a_format_module_extends_the_import_menu() {
    let wiring = wire(Platform::Linux);
    wiring.sync.start().unwrap();
    assert!(!template_ids(&wiring.toolkit).contains(&"import:opml:file".to_string()));

    wiring.interop.register_module(FormatModule {
        kind: FormatModuleKind::Importer,
        format: "opml".into(),
        sources: vec![ImportSource::File],
        is_note_archive: false,
        file_extensions: vec!["opml".into()],
        description: "OPML Outline".into(),
    });

    assert!(template_ids(&wiring.toolkit).contains(&"import:opml:file".to_string()));
}

#[test]
fn plugin_registration_shows_up_after_invalidate() {
    let wiring = wire(Platform::Linux);
    wiring.sync.start().unwrap();

    wiring.plugins.register(
        "backup",
        PluginContribution {
            menu_items: vec![jot_menubar::core::services::MenuContribution {
                parent: "tools".into(),
                item: MenuItemDescriptor::command("backup.run", "Create backup"),
            }],
            ..Default::default()
        },
    );
    // The plugin store is not a change source; the host invalidates.
    assert!(!template_ids(&wiring.toolkit).contains(&"backup.run".to_string()));
    wiring.sync.invalidate().unwrap();
    assert!(template_ids(&wiring.toolkit).contains(&"backup.run".to_string()));
}

#[test]
fn selection_change_reconciles_in_place() {
    let wiring = wire(Platform::Linux);
    wiring.sync.start().unwrap();
    let handle = wiring.sync.installed().unwrap();
    assert!(!handle.handle().item_flags("deleteNote").unwrap().enabled);

    let state = AppState::capture(Route::Main, 2, &*wiring.settings);
    wiring.sync.set_state(state).unwrap();

    let after = wiring.sync.installed().unwrap();
    assert!(Arc::ptr_eq(&handle, &after));
    assert!(after.handle().item_flags("deleteNote").unwrap().enabled);
}

#[test]
fn leaving_the_main_screen_collapses_the_menu() {
    let wiring = wire(Platform::MacOs);
    wiring.sync.start().unwrap();

    let state = AppState::capture(Route::Settings, 0, &*wiring.settings);
    wiring.sync.set_state(state).unwrap();

    let template = wiring.toolkit.last_template();
    assert_eq!(template.len(), 1);
    assert_eq!(template[0].items.len(), 1);
    assert_eq!(template[0].items[0].id.as_deref(), Some("quit"));
}

#[test]
fn menu_activation_reaches_registered_command_handlers() {
    let wiring = wire(Platform::Linux);
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();
    wiring.commands.register(
        CommandDeclaration::new("export", "Export").with_handler(move |args| {
            sink.lock().unwrap().push(args);
        }),
    );
    wiring.sync.start().unwrap();

    assert!(wiring.sync.activate("export:jex"));
    assert_eq!(*seen.lock().unwrap(), vec![vec!["jex".to_string()]]);
}

#[test]
fn cancelled_import_flow_is_side_effect_free() {
    let wiring = wire(Platform::Linux);
    let handler: ImportHandler = Arc::new(|_, _| panic!("handler must not run on cancel"));
    wiring.interop.register_import_handler("md", handler);
    smol::block_on(wiring.interop.run_import("md", ImportSource::File)).unwrap();
}
