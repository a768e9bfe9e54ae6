//! Menu synchronization orchestrator.
//!
//! Owns the single installed native menu handle. Full rebuilds replace
//! the handle wholesale; reconciliation mutates the most recently
//! installed handle in place. The two never interleave on the same
//! handle: a rebuild installs a complete template before any later
//! reconciliation pass targets it.

use crate::menu::assembler::TemplateAssembler;
use crate::menu::descriptor::{MenuAction, MenuItemDescriptor, RootMenu};
use crate::menu::reconcile::StateReconciler;
use crate::menu::watchers::Subscription;
use crate::menu::MenuError;
use crate::services::ChangeNotifier;
use crate::state::AppState;
use crate::toolkit::{MenuHandle, MenuToolkit};
use arc_swap::ArcSwapOption;
use std::sync::{Arc, Mutex, Weak};

/// The currently installed native menu.
pub struct InstalledMenu {
    handle: Arc<dyn MenuHandle>,
    roots: Vec<RootMenu>,
}

impl InstalledMenu {
    /// The native handle of this installation.
    pub fn handle(&self) -> &Arc<dyn MenuHandle> {
        &self.handle
    }

    /// The descriptor template this installation was built from.
    pub fn roots(&self) -> &[RootMenu] {
        &self.roots
    }
}

/// Keeps the native application menu synchronized with live state.
pub struct MenuSync {
    assembler: TemplateAssembler,
    reconciler: StateReconciler,
    toolkit: Arc<dyn MenuToolkit>,
    keymap_events: Arc<dyn ChangeNotifier>,
    format_events: Arc<dyn ChangeNotifier>,
    installed: ArcSwapOption<InstalledMenu>,
    last_state: Mutex<AppState>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl MenuSync {
    /// Create an orchestrator; nothing is installed until
    /// [`MenuSync::start`] or the first state update.
    pub fn new(
        assembler: TemplateAssembler,
        reconciler: StateReconciler,
        toolkit: Arc<dyn MenuToolkit>,
        keymap_events: Arc<dyn ChangeNotifier>,
        format_events: Arc<dyn ChangeNotifier>,
        initial_state: AppState,
    ) -> Self {
        Self {
            assembler,
            reconciler,
            toolkit,
            keymap_events,
            format_events,
            installed: ArcSwapOption::empty(),
            last_state: Mutex::new(initial_state),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe the rebuild triggers and install the initial menu.
    ///
    /// Keymap and format-registry changes alter the *shape* of the
    /// template (which items exist, what accelerator text they show),
    /// so each schedules a full rebuild rather than a reconciliation.
    /// Exactly one handler per source is live at a time.
    pub fn start(self: &Arc<Self>) -> Result<(), MenuError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        subscriptions.clear();
        subscriptions.push(Subscription::subscribe(
            self.keymap_events.clone(),
            rebuild_listener(Arc::downgrade(self), "keymap change"),
        ));
        subscriptions.push(Subscription::subscribe(
            self.format_events.clone(),
            rebuild_listener(Arc::downgrade(self), "format registry change"),
        ));
        drop(subscriptions);

        self.rebuild()
    }

    /// Unsubscribe the rebuild triggers.
    pub fn stop(&self) {
        self.subscriptions.lock().unwrap().clear();
    }

    /// Install a freshly assembled menu, replacing the previous handle.
    pub fn rebuild(&self) -> Result<(), MenuError> {
        let state = self.last_state.lock().unwrap().clone();
        let roots = self.assembler.assemble(&state)?;
        let handle = self.toolkit.build(&roots);
        self.toolkit.set_application_menu(handle.clone());
        log::debug!("installed menu with {} root(s)", roots.len());
        self.installed
            .store(Some(Arc::new(InstalledMenu { handle, roots })));
        Ok(())
    }

    /// Run the action of an installed item, as a host backend does
    /// when the user clicks it.
    ///
    /// Command actions dispatch through the command registry with
    /// their recorded arguments; inline callbacks run directly.
    /// Returns `false` when nothing is installed or the id has no
    /// actionable item.
    pub fn activate(&self, id: &str) -> bool {
        let Some(installed) = self.installed.load_full() else {
            return false;
        };
        let action = installed
            .roots()
            .iter()
            .find_map(|root| find_action(&root.items, id));
        match action {
            Some(action) => {
                action.invoke(&**self.reconciler.commands());
                true
            }
            None => {
                log::warn!("activation of unknown menu item `{}`", id);
                false
            }
        }
    }

    /// Reconcile flags on the installed handle without rebuilding.
    ///
    /// No-op when nothing has been installed yet.
    pub fn refresh(&self) {
        if let Some(installed) = self.installed.load_full() {
            let state = self.last_state.lock().unwrap().clone();
            self.reconciler.apply(&state, &**installed.handle());
        }
    }

    /// Accept a new state snapshot.
    ///
    /// A route change alters the template shape and triggers a full
    /// rebuild; any other change only reconciles flags in place.
    pub fn set_state(&self, state: AppState) -> Result<(), MenuError> {
        let route_changed = {
            let mut last = self.last_state.lock().unwrap();
            let changed = last.route != state.route;
            *last = state;
            changed
        };

        if route_changed || self.installed.load_full().is_none() {
            self.rebuild()
        } else {
            self.refresh();
            Ok(())
        }
    }

    /// Force a full rebuild with the last known state.
    ///
    /// Used when the extension list changes, which the engine is not
    /// subscribed to directly.
    pub fn invalidate(&self) -> Result<(), MenuError> {
        self.rebuild()
    }

    /// The current installation, if any. Exposed for identity checks.
    pub fn installed(&self) -> Option<Arc<InstalledMenu>> {
        self.installed.load_full()
    }

    /// The most recently accepted state snapshot.
    pub fn last_state(&self) -> AppState {
        self.last_state.lock().unwrap().clone()
    }
}

fn find_action(items: &[MenuItemDescriptor], id: &str) -> Option<MenuAction> {
    for item in items {
        if item.id.as_deref() == Some(id) {
            return item.action.clone();
        }
        if let Some(action) = find_action(&item.children, id) {
            return Some(action);
        }
    }
    None
}

fn rebuild_listener(sync: Weak<MenuSync>, reason: &'static str) -> Arc<dyn Fn() + Send + Sync> {
    Arc::new(move || {
        if let Some(sync) = sync.upgrade() {
            if let Err(err) = sync.rebuild() {
                log::error!("menu rebuild after {} failed: {}", reason, err);
            }
        }
    })
}
