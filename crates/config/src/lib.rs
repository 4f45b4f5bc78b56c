// Configuration loading and persistence

use std::path::PathBuf;

pub mod error;
pub mod persist;
pub mod platform;
pub mod recent;
pub mod settings;
pub mod snippets;
pub mod strings;

pub use error::ConfigError;
pub use persist::{JsonFileStore, MemoryStore, PersistenceGateway};
pub use platform::PlatformIntegration;
pub use recent::RecentDocuments;
pub use settings::Settings;
pub use snippets::{Snippet, SnippetLibrary};
pub use strings::{MsgKey, Strings};

/// `~/.config/querypad` (or the platform equivalent)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("querypad")
}
