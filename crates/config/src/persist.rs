// Key/value persistence
// The production store lives at ~/.config/querypad/prefs.json

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Narrow persistence contract the core depends on. Keys are opaque.
pub trait PersistenceGateway {
    /// Stored value for `key`, or `default` when nothing is stored.
    fn get(&self, key: &str, default: &str) -> String;

    /// Store `value` under `key`. Implementations write through immediately.
    fn put(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// In-memory store. Used by tests and by hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PersistenceGateway for MemoryStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.values.get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON object of string values, rewritten on every `put`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn default_path() -> PathBuf {
        crate::config_dir().join("prefs.json")
    }

    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("ignoring malformed {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| ConfigError::io(&self.path, e))
    }
}

impl PersistenceGateway for JsonFileStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.values.get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
