use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to an icon resource. The frontend decides how a key maps to
/// pixels; the core only carries the key around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(Cow<'static, str>);

impl IconRef {
    pub const TABLE: IconRef = IconRef::from_static("table");
    pub const SNIPPET: IconRef = IconRef::from_static("snippet");
    pub const DOCUMENT: IconRef = IconRef::from_static("document");
    pub const COMMAND: IconRef = IconRef::from_static("command");

    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for IconRef {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}
