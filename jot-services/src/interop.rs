//! Import/export format service.
//!
//! Keeps the format-module table (built-ins plus plugin-registered
//! modules), fires change listeners when the table grows, and drives
//! the interactive import flow: picker, busy indicator, handler, error
//! dialog.

use crate::dialogs::{BusyGuard, DialogService};
use anyhow::{anyhow, bail, Context, Result};
use jot_core::services::{
    ChangeListener, ChangeNotifier, FormatModule, FormatModuleKind, FormatRegistry, ImportSource,
    ListenerId,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Handler that performs the actual import of a picked path.
pub type ImportHandler = Arc<dyn Fn(&Path, ImportSource) -> Result<()> + Send + Sync>;

/// In-process import/export service.
pub struct InteropService {
    dialogs: Arc<dyn DialogService>,
    modules: Mutex<Vec<FormatModule>>,
    handlers: Mutex<HashMap<String, ImportHandler>>,
    listeners: Mutex<HashMap<u64, ChangeListener>>,
    next_listener: AtomicU64,
}

impl InteropService {
    /// Create a service with the built-in format modules.
    pub fn new(dialogs: Arc<dyn DialogService>) -> Self {
        Self {
            dialogs,
            modules: Mutex::new(builtin_modules()),
            handlers: Mutex::new(HashMap::new()),
            listeners: Mutex::new(HashMap::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    /// Register an additional format module (plugin-supplied) and
    /// notify listeners so menus rebuild.
    pub fn register_module(&self, module: FormatModule) {
        self.modules.lock().unwrap().push(module);
        self.notify();
    }

    /// Register the import handler for a format.
    pub fn register_import_handler(&self, format: &str, handler: ImportHandler) {
        self.handlers
            .lock()
            .unwrap()
            .insert(format.to_string(), handler);
    }

    /// Run the interactive import flow for one (format, source) pair.
    ///
    /// Cancelling the picker resolves without side effects. The busy
    /// indicator is held by a guard over the handler call, so it
    /// clears before any error dialog is shown.
    pub async fn run_import(&self, format: &str, source: ImportSource) -> Result<()> {
        let module = self
            .importer(format)
            .ok_or_else(|| anyhow!("no importer registered for `{}`", format))?;

        let path = match self.pick_path(&module, source).await {
            Some(path) => path,
            None => return Ok(()),
        };

        let outcome = {
            let _busy = BusyGuard::engage(self.dialogs.clone());
            self.import_path(format, &path, source)
        };

        if let Err(err) = outcome {
            log::error!("Import of {:?} as {} failed: {:#}", path, format, err);
            self.dialogs
                .show_error(&format!("Could not import notes: {}", err))
                .await;
        }
        Ok(())
    }

    fn importer(&self, format: &str) -> Option<FormatModule> {
        self.modules
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.kind == FormatModuleKind::Importer && m.format == format)
            .cloned()
    }

    async fn pick_path(&self, module: &FormatModule, source: ImportSource) -> Option<PathBuf> {
        match source {
            ImportSource::File => self.dialogs.open_file(&module.file_extensions).await,
            ImportSource::Directory => self.dialogs.open_directory().await,
        }
    }

    fn import_path(&self, format: &str, path: &Path, source: ImportSource) -> Result<()> {
        let handler = self
            .handlers
            .lock()
            .unwrap()
            .get(format)
            .cloned()
            .ok_or_else(|| anyhow!("no import handler for `{}`", format))?;
        handler(path, source).with_context(|| format!("importing {:?}", path))
    }

    /// Fail when a format has an importer module but no handler; used
    /// by startup wiring as a sanity check.
    pub fn verify_import_handlers(&self) -> Result<()> {
        let handlers = self.handlers.lock().unwrap();
        for module in self.modules.lock().unwrap().iter() {
            if module.kind == FormatModuleKind::Importer && !handlers.contains_key(&module.format) {
                bail!("importer `{}` has no handler", module.format);
            }
        }
        Ok(())
    }

    fn notify(&self) {
        let listeners: Vec<ChangeListener> =
            self.listeners.lock().unwrap().values().cloned().collect();
        for listener in listeners {
            listener();
        }
    }
}

impl FormatRegistry for InteropService {
    fn list_modules(&self) -> Vec<FormatModule> {
        self.modules.lock().unwrap().clone()
    }
}

impl ChangeNotifier for InteropService {
    fn subscribe(&self, listener: ChangeListener) -> ListenerId {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().insert(id, listener);
        ListenerId(id)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.lock().unwrap().remove(&id.0);
    }
}

fn exporter(format: &str, description: &str, archive: bool, extensions: &[&str]) -> FormatModule {
    FormatModule {
        kind: FormatModuleKind::Exporter,
        format: format.into(),
        sources: Vec::new(),
        is_note_archive: archive,
        file_extensions: extensions.iter().map(|e| e.to_string()).collect(),
        description: description.into(),
    }
}

fn importer(
    format: &str,
    description: &str,
    archive: bool,
    sources: &[ImportSource],
    extensions: &[&str],
) -> FormatModule {
    FormatModule {
        kind: FormatModuleKind::Importer,
        format: format.into(),
        sources: sources.to_vec(),
        is_note_archive: archive,
        file_extensions: extensions.iter().map(|e| e.to_string()).collect(),
        description: description.into(),
    }
}

/// The format handlers every installation ships with.
fn builtin_modules() -> Vec<FormatModule> {
    vec![
        exporter("jex", "Jot Export File", true, &["jex"]),
        exporter("raw", "Jot Export Directory", true, &[]),
        // Partial exporters operate on a selection, never the archive.
        exporter("md", "Markdown", false, &["md"]),
        exporter("html", "HTML Document", false, &["html"]),
        exporter("pdf", "PDF Document", false, &["pdf"]),
        importer("jex", "Jot Export File", true, &[ImportSource::File], &["jex"]),
        importer("enex", "Evernote Export File", false, &[ImportSource::File], &["enex"]),
        importer(
            "md",
            "Markdown",
            false,
            &[ImportSource::File, ImportSource::Directory],
            &["md"],
        ),
        importer("raw", "Jot Export Directory", true, &[ImportSource::Directory], &[]),
    ]
}
