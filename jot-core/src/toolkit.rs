//! Host menu toolkit seam.
//!
//! The engine builds descriptor trees and hands them to a
//! [`MenuToolkit`] implementation; reconciliation mutates flags on the
//! returned [`MenuHandle`] by stable item id. [`MemoryToolkit`] is the
//! in-tree backend used headless and in tests.

use crate::menu::descriptor::{MenuItemDescriptor, RootMenu};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Live flags of one identified item in an installed menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFlags {
    /// Whether the item is clickable.
    pub enabled: bool,
    /// Whether a checkbox item is checked.
    pub checked: bool,
}

/// A built native menu, addressable by stable item id.
///
/// The mutators return `false` when the id is unknown; callers treat
/// that as a benign race and move on.
pub trait MenuHandle: Send + Sync {
    /// Set the enabled flag of an item. Returns `false` if the id is unknown.
    fn set_enabled(&self, id: &str, enabled: bool) -> bool;

    /// Set the checked flag of an item. Returns `false` if the id is unknown.
    fn set_checked(&self, id: &str, checked: bool) -> bool;

    /// Current flags of an item, if it exists.
    fn item_flags(&self, id: &str) -> Option<ItemFlags>;
}

/// The native menu widget toolkit.
pub trait MenuToolkit: Send + Sync {
    /// Build a native menu from a descriptor template.
    fn build(&self, roots: &[RootMenu]) -> Arc<dyn MenuHandle>;

    /// Install a built menu as the active application menu.
    fn set_application_menu(&self, handle: Arc<dyn MenuHandle>);
}

/// In-memory toolkit backend.
///
/// Records the installed template and handle so tests can assert on
/// structure, flag state and handle identity.
#[derive(Default)]
pub struct MemoryToolkit {
    installed: Mutex<Option<Arc<dyn MenuHandle>>>,
    last_template: Mutex<Vec<RootMenu>>,
    installs: AtomicUsize,
}

impl MemoryToolkit {
    /// Create a new backend with no installed menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently installed handle, if any.
    pub fn installed(&self) -> Option<Arc<dyn MenuHandle>> {
        self.installed.lock().unwrap().clone()
    }

    /// The descriptor template of the last build.
    pub fn last_template(&self) -> Vec<RootMenu> {
        self.last_template.lock().unwrap().clone()
    }

    /// How many times a menu has been installed.
    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }
}

impl MenuToolkit for MemoryToolkit {
    fn build(&self, roots: &[RootMenu]) -> Arc<dyn MenuHandle> {
        *self.last_template.lock().unwrap() = roots.to_vec();
        Arc::new(MemoryMenuHandle::new(roots))
    }

    fn set_application_menu(&self, handle: Arc<dyn MenuHandle>) {
        *self.installed.lock().unwrap() = Some(handle);
        self.installs.fetch_add(1, Ordering::SeqCst);
    }
}

/// Menu handle backed by a flat id → flags table.
pub struct MemoryMenuHandle {
    flags: Mutex<HashMap<String, ItemFlags>>,
}

impl MemoryMenuHandle {
    fn new(roots: &[RootMenu]) -> Self {
        let mut flags = HashMap::new();
        for root in roots {
            collect_flags(&root.items, &mut flags);
        }
        Self {
            flags: Mutex::new(flags),
        }
    }
}

fn collect_flags(items: &[MenuItemDescriptor], out: &mut HashMap<String, ItemFlags>) {
    for item in items {
        if let Some(id) = &item.id {
            out.insert(
                id.clone(),
                ItemFlags {
                    enabled: item.enabled,
                    checked: item.checked,
                },
            );
        }
        collect_flags(&item.children, out);
    }
}

impl MenuHandle for MemoryMenuHandle {
    fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        let mut flags = self.flags.lock().unwrap();
        match flags.get_mut(id) {
            Some(f) => {
                f.enabled = enabled;
                true
            }
            None => false,
        }
    }

    fn set_checked(&self, id: &str, checked: bool) -> bool {
        let mut flags = self.flags.lock().unwrap();
        match flags.get_mut(id) {
            Some(f) => {
                f.checked = checked;
                true
            }
            None => false,
        }
    }

    fn item_flags(&self, id: &str) -> Option<ItemFlags> {
        self.flags.lock().unwrap().get(id).copied()
    }
}
