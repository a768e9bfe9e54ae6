//! Keymap service.
//!
//! Holds the command → accelerator table: built-in defaults, a TOML
//! override file from the XDG config locations, and runtime rebinding.
//! Every mutation fires the change listeners so the menu engine can
//! rebuild with fresh accelerator text.

use indexmap::IndexMap;
use jot_core::platform::Platform;
use jot_core::services::{AcceleratorResolver, ChangeListener, ChangeNotifier, ListenerId};
use serde::Deserialize;
use smol::fs;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use xdg::BaseDirectories;

/// Failure to parse an accelerator string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AcceleratorError {
    /// The string was empty.
    #[error("empty accelerator")]
    Empty,
    /// Every token was a modifier; no key remained.
    #[error("accelerator `{0}` has no key")]
    MissingKey(String),
}

/// A parsed keyboard shortcut.
///
/// `CmdOrCtrl` is kept symbolic so one binding table serves every
/// platform; it renders as `Cmd` on macOS and `Ctrl` elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accelerator {
    cmd_or_ctrl: bool,
    ctrl: bool,
    alt: bool,
    shift: bool,
    key: String,
}

impl Accelerator {
    /// Parse an accelerator like `"CmdOrCtrl+Shift+N"`.
    ///
    /// The last token is the key; everything before it must be a
    /// modifier. Unknown modifier tokens are treated as part of a
    /// malformed key position and rejected through [`AcceleratorError`].
    pub fn parse(text: &str) -> Result<Self, AcceleratorError> {
        if text.trim().is_empty() {
            return Err(AcceleratorError::Empty);
        }

        let mut accelerator = Self {
            cmd_or_ctrl: false,
            ctrl: false,
            alt: false,
            shift: false,
            key: String::new(),
        };

        let tokens: Vec<&str> = text.split('+').map(str::trim).collect();
        let (key, modifiers) = tokens.split_last().ok_or(AcceleratorError::Empty)?;
        for modifier in modifiers {
            match modifier.to_ascii_lowercase().as_str() {
                "cmdorctrl" | "commandorcontrol" => accelerator.cmd_or_ctrl = true,
                "ctrl" | "control" => accelerator.ctrl = true,
                "alt" | "option" => accelerator.alt = true,
                "shift" => accelerator.shift = true,
                _ => return Err(AcceleratorError::MissingKey(text.to_string())),
            }
        }

        if key.is_empty() {
            return Err(AcceleratorError::MissingKey(text.to_string()));
        }
        accelerator.key = key.to_string();
        Ok(accelerator)
    }

    /// Platform-formatted display text, e.g. `"Ctrl+Shift+N"`.
    pub fn display(&self, platform: Platform) -> String {
        let mut parts = Vec::new();
        if self.cmd_or_ctrl {
            parts.push(if platform.is_mac() { "Cmd" } else { "Ctrl" });
        }
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(&self.key);
        parts.join("+")
    }
}

#[derive(Debug, Default, Deserialize)]
struct KeymapFile {
    #[serde(default)]
    bindings: HashMap<String, String>,
}

/// Command → accelerator table with change notification.
pub struct KeymapService {
    platform: Platform,
    bindings: Mutex<IndexMap<String, Accelerator>>,
    listeners: Mutex<HashMap<u64, ChangeListener>>,
    next_listener: AtomicU64,
}

impl KeymapService {
    /// Create a service with the built-in default bindings.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            bindings: Mutex::new(default_bindings()),
            listeners: Mutex::new(HashMap::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    /// Load `keymap.toml` overrides from standard locations in
    /// precedence order (system config dirs first, user config last).
    pub async fn load(&self) -> anyhow::Result<()> {
        let xdg_dirs = BaseDirectories::with_prefix("jot")?;

        for path in xdg_dirs.find_config_files("keymap.toml").rev() {
            self.load_file(&path).await;
        }
        let user_path = xdg_dirs.get_config_home().join("keymap.toml");
        if user_path.exists() {
            self.load_file(&user_path).await;
        }

        Ok(())
    }

    async fn load_file(&self, path: &Path) {
        log::info!("Loading keymap from: {:?}", path);
        match fs::read_to_string(path).await {
            Ok(content) => self.apply_overrides(&content),
            Err(e) => {
                log::warn!("Failed to read keymap file {:?}: {}", path, e);
            }
        }
    }

    /// Merge override bindings from TOML text.
    ///
    /// An unparsable accelerator invalidates that one binding, not the
    /// whole file.
    pub fn apply_overrides(&self, content: &str) {
        let file: KeymapFile = match toml::from_str(content) {
            Ok(file) => file,
            Err(e) => {
                log::error!("Failed to parse keymap file: {}", e);
                return;
            }
        };

        let mut changed = false;
        {
            let mut bindings = self.bindings.lock().unwrap();
            for (command, text) in file.bindings {
                match Accelerator::parse(&text) {
                    Ok(accelerator) => {
                        bindings.insert(command, accelerator);
                        changed = true;
                    }
                    Err(e) => {
                        log::warn!("Skipping binding for `{}`: {}", command, e);
                    }
                }
            }
        }
        if changed {
            self.notify();
        }
    }

    /// Rebind one command and notify listeners.
    pub fn set_binding(&self, command: &str, accelerator: Accelerator) {
        self.bindings
            .lock()
            .unwrap()
            .insert(command.to_string(), accelerator);
        self.notify();
    }

    fn notify(&self) {
        let listeners: Vec<ChangeListener> =
            self.listeners.lock().unwrap().values().cloned().collect();
        for listener in listeners {
            listener();
        }
    }
}

impl AcceleratorResolver for KeymapService {
    fn accelerator_for(&self, id: &str) -> Option<String> {
        self.bindings
            .lock()
            .unwrap()
            .get(id)
            .map(|a| a.display(self.platform))
    }
}

impl ChangeNotifier for KeymapService {
    fn subscribe(&self, listener: ChangeListener) -> ListenerId {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().insert(id, listener);
        ListenerId(id)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.lock().unwrap().remove(&id.0);
    }
}

fn binding(command: &str, text: &str) -> (String, Accelerator) {
    // Defaults are compiled in; a parse failure here is a typo in this
    // file and must surface immediately.
    (
        command.to_string(),
        Accelerator::parse(text).unwrap_or_else(|e| panic!("default binding {}: {}", command, e)),
    )
}

fn default_bindings() -> IndexMap<String, Accelerator> {
    IndexMap::from_iter([
        binding("newNote", "CmdOrCtrl+N"),
        binding("newTodo", "CmdOrCtrl+T"),
        binding("newFolder", "CmdOrCtrl+Shift+N"),
        binding("synchronize", "CmdOrCtrl+S"),
        binding("print", "CmdOrCtrl+P"),
        binding("closeWindow", "CmdOrCtrl+W"),
        binding("quit", "CmdOrCtrl+Q"),
        binding("copy", "CmdOrCtrl+C"),
        binding("cut", "CmdOrCtrl+X"),
        binding("paste", "CmdOrCtrl+V"),
        binding("selectAll", "CmdOrCtrl+A"),
        binding("toggleSidebar", "F10"),
        binding("toggleNoteList", "F11"),
        binding("toggleVisiblePanes", "CmdOrCtrl+L"),
        binding("setTags", "CmdOrCtrl+Alt+T"),
        binding("settings", "CmdOrCtrl+,"),
    ])
}
