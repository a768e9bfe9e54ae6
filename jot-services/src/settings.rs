//! Settings registry service.
//!
//! Settings are declared up front with metadata (label, default,
//! enumerated options in declaration order); live values overlay the
//! defaults and can themselves be overlaid by a TOML file from the XDG
//! config locations. Config problems are logged, never fatal.

use indexmap::IndexMap;
use jot_core::services::{SettingValue, SettingsStore};
use jot_core::state::keys;
use smol::fs;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use xdg::BaseDirectories;

/// Declared metadata of one setting.
#[derive(Clone)]
pub struct SettingMetadata {
    /// Stable key, e.g. `"notes.sortOrder.field"`.
    pub key: String,
    /// Localized label.
    pub label: String,
    /// Value used until something writes the setting.
    pub default: SettingValue,
    /// Enumerated options (value → label), empty for free settings.
    pub options: IndexMap<String, String>,
}

impl SettingMetadata {
    /// Declare a non-enumerated setting.
    pub fn new(key: impl Into<String>, label: impl Into<String>, default: SettingValue) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            default,
            options: IndexMap::new(),
        }
    }

    /// Attach enumerated options; their order here is the order menus
    /// will show them in.
    pub fn with_options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }
}

/// In-process settings registry.
pub struct SettingsService {
    metadata: Mutex<IndexMap<String, SettingMetadata>>,
    values: Mutex<HashMap<String, SettingValue>>,
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsService {
    /// Create a registry with the menu engine's settings declared.
    pub fn new() -> Self {
        let service = Self {
            metadata: Mutex::new(IndexMap::new()),
            values: Mutex::new(HashMap::new()),
        };
        for metadata in engine_settings() {
            service.declare(metadata);
        }
        service
    }

    /// Declare a setting, replacing any previous declaration.
    pub fn declare(&self, metadata: SettingMetadata) {
        self.metadata
            .lock()
            .unwrap()
            .insert(metadata.key.clone(), metadata);
    }

    /// Load `settings.toml` overlays from standard locations in
    /// precedence order (system config dirs first, user config last).
    pub async fn load(&self) -> anyhow::Result<()> {
        let xdg_dirs = BaseDirectories::with_prefix("jot")?;

        for path in xdg_dirs.find_config_files("settings.toml").rev() {
            self.load_file(&path).await;
        }
        let user_path = xdg_dirs.get_config_home().join("settings.toml");
        if user_path.exists() {
            self.load_file(&user_path).await;
        }

        Ok(())
    }

    async fn load_file(&self, path: &Path) {
        log::info!("Loading settings from: {:?}", path);
        match fs::read_to_string(path).await {
            Ok(content) => self.apply_overrides(&content),
            Err(e) => {
                log::warn!("Failed to read settings file {:?}: {}", path, e);
            }
        }
    }

    /// Merge an overlay from TOML text.
    ///
    /// Dotted keys arrive as nested tables and are flattened back to
    /// the declared key form. Entries for undeclared keys are skipped
    /// with a warning.
    pub fn apply_overrides(&self, content: &str) {
        let table: toml::Table = match toml::from_str(content) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to parse settings file: {}", e);
                return;
            }
        };

        let mut flat = Vec::new();
        flatten("", &table, &mut flat);
        for (key, value) in flat {
            if !self.metadata.lock().unwrap().contains_key(&key) {
                log::warn!("Skipping unknown setting `{}`", key);
                continue;
            }
            match to_setting_value(&value) {
                Some(value) => self.set(&key, value),
                None => {
                    log::warn!("Skipping setting `{}`: unsupported value type", key);
                }
            }
        }
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut Vec<(String, toml::Value)>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::Table(nested) => flatten(&path, nested, out),
            other => out.push((path, other.clone())),
        }
    }
}

fn to_setting_value(value: &toml::Value) -> Option<SettingValue> {
    match value {
        toml::Value::Boolean(v) => Some(SettingValue::Bool(*v)),
        toml::Value::Integer(v) => Some(SettingValue::Int(*v)),
        toml::Value::String(v) => Some(SettingValue::Text(v.clone())),
        _ => None,
    }
}

impl SettingsStore for SettingsService {
    fn get(&self, key: &str) -> SettingValue {
        if let Some(value) = self.values.lock().unwrap().get(key) {
            return value.clone();
        }
        match self.metadata.lock().unwrap().get(key) {
            Some(metadata) => metadata.default.clone(),
            None => {
                log::warn!("Read of undeclared setting `{}`", key);
                SettingValue::Bool(false)
            }
        }
    }

    fn set(&self, key: &str, value: SettingValue) {
        self.values.lock().unwrap().insert(key.to_string(), value);
    }

    fn incr(&self, key: &str, delta: i64) {
        let current = self.get(key).as_int();
        self.set(key, SettingValue::Int(current + delta));
    }

    fn enum_options(&self, key: &str) -> IndexMap<String, String> {
        self.metadata
            .lock()
            .unwrap()
            .get(key)
            .map(|m| m.options.clone())
            .unwrap_or_default()
    }

    fn metadata_label(&self, key: &str) -> String {
        self.metadata
            .lock()
            .unwrap()
            .get(key)
            .map(|m| m.label.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

fn engine_settings() -> Vec<SettingMetadata> {
    vec![
        SettingMetadata::new(
            keys::NOTES_SORT_FIELD,
            "Sort notes by",
            SettingValue::Text("user_updated_time".into()),
        )
        .with_options([
            ("user_updated_time", "Updated date"),
            ("user_created_time", "Created date"),
            ("title", "Title"),
            ("order", "Custom order"),
        ]),
        SettingMetadata::new(
            keys::NOTES_SORT_REVERSE,
            "Reverse sort order",
            SettingValue::Bool(true),
        ),
        SettingMetadata::new(
            keys::FOLDERS_SORT_FIELD,
            "Sort notebooks by",
            SettingValue::Text("title".into()),
        )
        .with_options([
            ("title", "Title"),
            ("last_note_user_updated_time", "Last updated note"),
        ]),
        SettingMetadata::new(
            keys::FOLDERS_SORT_REVERSE,
            "Reverse sort order",
            SettingValue::Bool(false),
        ),
        SettingMetadata::new(
            keys::SHOW_NOTE_COUNTS,
            "Show note counts",
            SettingValue::Bool(true),
        ),
        SettingMetadata::new(
            keys::UNCOMPLETED_TODOS_ON_TOP,
            "Uncompleted to-dos on top",
            SettingValue::Bool(true),
        ),
        SettingMetadata::new(
            keys::SHOW_COMPLETED_TODOS,
            "Show completed to-dos",
            SettingValue::Bool(true),
        ),
        SettingMetadata::new(
            keys::LAYOUT_BUTTON_SEQUENCE,
            "Layout button sequence",
            SettingValue::Int(0),
        ),
    ]
}
