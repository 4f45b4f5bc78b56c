// Application settings
// Loaded from ~/.config/querypad/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use querypad_core::recency::DEFAULT_RECENT_CAPACITY;

use crate::error::ConfigError;

/// Keyboard modifier style preference (primarily for macOS users)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierStyle {
    /// Use platform-native modifier (Cmd on macOS, Ctrl on Windows/Linux)
    #[default]
    Platform,
    /// Always use Ctrl
    Ctrl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Recent documents
    #[serde(rename = "recent.capacity")]
    pub recent_capacity: usize,

    // Completion
    #[serde(rename = "completion.enabled")]
    pub completion_enabled: bool,

    // Command palette
    #[serde(rename = "palette.maxResults")]
    pub palette_max_results: usize,

    // Editor
    #[serde(rename = "editor.defaultServer")]
    pub default_server: Option<String>,

    #[serde(rename = "editor.snippetsFile")]
    pub snippets_file: Option<PathBuf>,

    // Keyboard
    #[serde(rename = "keyboard.modifierStyle")]
    pub modifier_style: ModifierStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            completion_enabled: true,
            palette_max_results: 50,
            default_server: None,
            snippets_file: None,
            modifier_style: ModifierStyle::default(),
        }
    }
}

const DEFAULT_CONFIG: &str = r#"{
    // Number of documents kept in File > Open Recent
    "recent.capacity": 9,

    // Offer completions while typing
    "completion.enabled": true,

    // Maximum rows shown in the command palette
    "palette.maxResults": 50,

    // Server used in generated code blocks when none is selected
    "editor.defaultServer": null,

    // Custom snippet library (TOML); null = ~/.config/querypad/snippets.toml
    "editor.snippetsFile": null,

    // Keyboard (macOS only: "platform" = Cmd, "ctrl" = Ctrl)
    "keyboard.modifierStyle": "platform"
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        crate::config_dir().join("settings.json")
    }

    /// Load settings from the default location, writing a commented default
    /// file on first run.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            if let Err(e) = Self::create_default_file(&path) {
                log::warn!("could not write default settings: {}", e);
            }
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::parse(&contents).map_err(|e| ConfigError::parse(path, e))
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, json).map_err(|e| ConfigError::io(path, e))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    fn create_default_file(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }
        fs::write(path, DEFAULT_CONFIG).map_err(|e| ConfigError::io(path, e))
    }

    /// Effective snippet library location
    pub fn snippets_path(&self) -> PathBuf {
        self.snippets_file
            .clone()
            .unwrap_or_else(|| crate::config_dir().join("snippets.toml"))
    }
}
