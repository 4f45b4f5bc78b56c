// Reusable code snippets offered through the command palette
// Loaded from ~/.config/querypad/snippets.toml:
//
//   [[snippet]]
//   title = "Select top rows"
//   body = "SELECT * FROM t LIMIT 100"
//   keystroke = "ctrl-alt-t"

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use querypad_core::Keystroke;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystroke: Option<Keystroke>,
}

impl Snippet {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            detail: None,
            keystroke: None,
        }
    }

    pub fn with_keystroke(mut self, keystroke: Keystroke) -> Self {
        self.keystroke = Some(keystroke);
        self
    }

    /// First line of the body, used as palette detail when none is set.
    pub fn preview(&self) -> &str {
        self.detail
            .as_deref()
            .unwrap_or_else(|| self.body.lines().next().unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnippetLibrary {
    #[serde(default, rename = "snippet")]
    pub snippets: Vec<Snippet>,
}

impl SnippetLibrary {
    pub fn builtin() -> Self {
        Self {
            snippets: vec![
                Snippet::new("Select Top Rows", "SELECT * FROM table_name LIMIT 100"),
                Snippet::new("Count Rows", "SELECT COUNT(*) FROM table_name"),
                Snippet::new(
                    "Group By Count",
                    "SELECT col, COUNT(*) AS n\nFROM table_name\nGROUP BY col\nORDER BY n DESC",
                ),
                Snippet::new(
                    "Chart Block",
                    "```sql type='line' server=''\nSELECT * FROM table_name\n```\n",
                ),
                Snippet::new("Markdown Table", "| a | b |\n|---|---|\n| 1 | 2 |\n"),
            ],
        }
    }

    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml(&contents).map_err(|e| ConfigError::parse(path, e))
    }

    /// Load the library at `path`. Missing file gives the built-in set; a
    /// malformed one is logged and also gives the built-in set.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::builtin();
        }
        match Self::try_load(path) {
            Ok(library) => library,
            Err(e) => {
                log::warn!("{}; using built-in snippets", e);
                Self::builtin()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snippet> {
        self.snippets.iter()
    }
}
