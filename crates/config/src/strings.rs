// User-facing text lookup
// Built once at startup and passed by reference; overrides come from a TOML
// table keyed by snake_case message names:
//
//   palette_title = "Befehle"

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Every string the core produces on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgKey {
    PaletteTitle,
    PalettePlaceholder,
    PaletteEmpty,
    OpenRecent,
    InsertSnippet,
    CodeBlockFor,
    TableLabel,
    ChartTypeLabel,
    ServerLabel,
    NoCompletions,
}

impl MsgKey {
    pub const ALL: &'static [MsgKey] = &[
        Self::PaletteTitle,
        Self::PalettePlaceholder,
        Self::PaletteEmpty,
        Self::OpenRecent,
        Self::InsertSnippet,
        Self::CodeBlockFor,
        Self::TableLabel,
        Self::ChartTypeLabel,
        Self::ServerLabel,
        Self::NoCompletions,
    ];

    /// Name used in override files
    pub fn name(&self) -> &'static str {
        match self {
            Self::PaletteTitle => "palette_title",
            Self::PalettePlaceholder => "palette_placeholder",
            Self::PaletteEmpty => "palette_empty",
            Self::OpenRecent => "open_recent",
            Self::InsertSnippet => "insert_snippet",
            Self::CodeBlockFor => "code_block_for",
            Self::TableLabel => "table_label",
            Self::ChartTypeLabel => "chart_type_label",
            Self::ServerLabel => "server_label",
            Self::NoCompletions => "no_completions",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    fn english(&self) -> &'static str {
        match self {
            Self::PaletteTitle => "Command Palette",
            Self::PalettePlaceholder => "Type to filter commands",
            Self::PaletteEmpty => "No matching commands",
            Self::OpenRecent => "Open Recent: {}",
            Self::InsertSnippet => "Insert Snippet: {}",
            Self::CodeBlockFor => "Code block for {}",
            Self::TableLabel => "Table",
            Self::ChartTypeLabel => "Chart type",
            Self::ServerLabel => "Server",
            Self::NoCompletions => "No completions",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Strings {
    table: HashMap<MsgKey, String>,
}

impl Strings {
    pub fn english() -> Self {
        let table = MsgKey::ALL
            .iter()
            .map(|k| (*k, k.english().to_string()))
            .collect();
        Self { table }
    }

    /// English table with the given TOML overrides applied. Unknown keys are
    /// logged and skipped.
    pub fn with_overrides(source: &str) -> Result<Self, toml::de::Error> {
        let overrides: BTreeMap<String, String> = toml::from_str(source)?;
        let mut strings = Self::english();
        for (name, text) in overrides {
            match MsgKey::from_name(&name) {
                Some(key) => {
                    strings.table.insert(key, text);
                }
                None => log::warn!("unknown string key '{}'", name),
            }
        }
        Ok(strings)
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::with_overrides(&contents).map_err(|e| ConfigError::parse(path, e))
    }

    /// English with overrides from `path` when it exists and parses.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::english();
        }
        Self::try_load(path).unwrap_or_else(|e| {
            log::warn!("{}; using built-in strings", e);
            Self::english()
        })
    }

    pub fn get(&self, key: MsgKey) -> &str {
        self.table.get(&key).map(String::as_str).unwrap_or_else(|| key.english())
    }

    /// Substitute `arg` for the first `{}` in the message.
    pub fn format(&self, key: MsgKey, arg: &str) -> String {
        self.get(key).replacen("{}", arg, 1)
    }
}

impl Default for Strings {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_text() {
        let strings = Strings::english();
        for key in MsgKey::ALL {
            assert!(!strings.get(*key).is_empty(), "{:?} has no text", key);
            assert_eq!(MsgKey::from_name(key.name()), Some(*key));
        }
    }

    #[test]
    fn test_format_substitutes() {
        let strings = Strings::english();
        assert_eq!(strings.format(MsgKey::OpenRecent, "a.md"), "Open Recent: a.md");
    }

    #[test]
    fn test_overrides_apply() {
        let strings = Strings::with_overrides("palette_title = \"Befehle\"\nbogus = \"x\"\n").unwrap();
        assert_eq!(strings.get(MsgKey::PaletteTitle), "Befehle");
        assert_eq!(strings.get(MsgKey::TableLabel), "Table");
    }
}
