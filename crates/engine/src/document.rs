//! The editor-facing side of completion: which kind of document is open, and
//! the narrow interface the engine needs from the text buffer.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Document type, as far as completion cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentMode {
    /// Markdown-style notebook with fenced query blocks and chart attributes.
    Markup,
    /// Plain query file.
    Query,
    /// Anything else. Never offers completions.
    Unknown,
}

impl DocumentMode {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" | "qmd" => Self::Markup,
            "sql" | "q" | "k" => Self::Query,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Query => "query",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markup" | "markdown" | "md" => Ok(Self::Markup),
            "query" | "sql" | "q" => Ok(Self::Query),
            "unknown" | "plain" | "text" => Ok(Self::Unknown),
            other => Err(format!("unknown document mode '{other}'")),
        }
    }
}

/// What completion needs from the text buffer. Offsets are in chars.
pub trait DocumentEditor {
    fn text(&self) -> &str;
    fn caret_offset(&self) -> usize;
    fn mode(&self) -> DocumentMode;
    /// Insert `text` at the caret, leaving the caret after it.
    fn insert_at_caret(&mut self, text: &str);
}

/// In-memory buffer, enough for headless use and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    text: String,
    caret: usize,
    mode: DocumentMode,
}

impl TextDocument {
    /// Caret starts at the end of `text`.
    pub fn new(text: impl Into<String>, mode: DocumentMode) -> Self {
        let text = text.into();
        let caret = text.chars().count();
        Self { text, caret, mode }
    }

    /// Move the caret, clamped to the text length.
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.text.chars().count());
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl DocumentEditor for TextDocument {
    fn text(&self) -> &str {
        &self.text
    }

    fn caret_offset(&self) -> usize {
        self.caret
    }

    fn mode(&self) -> DocumentMode {
        self.mode
    }

    fn insert_at_caret(&mut self, text: &str) {
        let at = byte_offset(&self.text, self.caret);
        self.text.insert_str(at, text);
        self.caret += text.chars().count();
    }
}

/// Byte index of char offset `chars`, clamped to the end of `text`.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
