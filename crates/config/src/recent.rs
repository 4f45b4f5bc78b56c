// Recently opened documents and the last-used folder
// Stored as "<path1>;<path2>;..." most-recent-first

use std::path::{Path, PathBuf};

use querypad_core::recency::{RecencyCache, DEFAULT_RECENT_CAPACITY};

use crate::persist::PersistenceGateway;

pub const RECENT_DOCUMENTS_KEY: &str = "recent.documents";
pub const LAST_FOLDER_KEY: &str = "recent.lastFolder";
const DELIMITER: &str = ";";

/// Split a stored recent list. Blank segments are dropped; the rest are
/// kept byte for byte, since paths may start or end with spaces.
pub fn parse_recent(stored: &str) -> Vec<PathBuf> {
    stored
        .split(DELIMITER)
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn format_recent<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> String {
    paths
        .into_iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

/// Recent documents list, written through to the store on every change.
#[derive(Debug, Clone)]
pub struct RecentDocuments {
    cache: RecencyCache<PathBuf>,
}

impl RecentDocuments {
    pub fn new(capacity: usize) -> Self {
        Self { cache: RecencyCache::new(capacity) }
    }

    /// Load from `store`. A missing or garbled value gives an empty list.
    pub fn load(store: &dyn PersistenceGateway, capacity: usize) -> Self {
        let stored = store.get(RECENT_DOCUMENTS_KEY, "");
        Self { cache: RecencyCache::from_ordered(capacity, parse_recent(&stored)) }
    }

    /// Mark `path` as just opened and persist.
    pub fn record(&mut self, path: impl Into<PathBuf>, store: &mut dyn PersistenceGateway) {
        self.cache.add(path.into());
        self.save(store);
    }

    pub fn remove(&mut self, path: &Path, store: &mut dyn PersistenceGateway) -> bool {
        let removed = self.cache.remove(&path.to_path_buf());
        if removed {
            self.save(store);
        }
        removed
    }

    pub fn clear(&mut self, store: &mut dyn PersistenceGateway) {
        self.cache.clear();
        self.save(store);
    }

    /// Paths, most recent first.
    pub fn paths(&self) -> &[PathBuf] {
        self.cache.get_all()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn save(&self, store: &mut dyn PersistenceGateway) {
        let value = format_recent(self.cache.get_all());
        if let Err(e) = store.put(RECENT_DOCUMENTS_KEY, &value) {
            log::warn!("failed to persist recent documents: {}", e);
        }
    }
}

impl Default for RecentDocuments {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY)
    }
}

pub fn last_folder(store: &dyn PersistenceGateway) -> Option<PathBuf> {
    let stored = store.get(LAST_FOLDER_KEY, "");
    let trimmed = stored.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

pub fn set_last_folder(store: &mut dyn PersistenceGateway, folder: &Path) {
    if let Err(e) = store.put(LAST_FOLDER_KEY, &folder.to_string_lossy()) {
        log::warn!("failed to persist last folder: {}", e);
    }
}
