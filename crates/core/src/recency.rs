//! Bounded most-recently-used list.
//!
//! Entries are kept most-recent-first. Re-adding an entry moves it to the
//! front without growing the list; adding past capacity silently drops the
//! oldest entry.

/// Default capacity used for the recent documents list.
pub const DEFAULT_RECENT_CAPACITY: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyCache<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: PartialEq> RecencyCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a cache from entries already ordered most-recent-first.
    /// Later duplicates and anything beyond capacity are dropped.
    pub fn from_ordered(capacity: usize, entries: impl IntoIterator<Item = T>) -> Self {
        let mut cache = Self::new(capacity);
        for entry in entries {
            if cache.items.len() >= capacity {
                break;
            }
            if !cache.items.contains(&entry) {
                cache.items.push(entry);
            }
        }
        cache
    }

    /// Record `item` as the most recent entry.
    ///
    /// Returns the evicted entry, if adding pushed one out.
    pub fn add(&mut self, item: T) -> Option<T> {
        if let Some(pos) = self.items.iter().position(|existing| *existing == item) {
            let existing = self.items.remove(pos);
            self.items.insert(0, existing);
            return None;
        }

        self.items.insert(0, item);
        if self.items.len() > self.capacity {
            self.items.pop()
        } else {
            None
        }
    }

    /// Remove an entry. Returns true if it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        let before = self.items.len();
        self.items.retain(|existing| existing != item);
        self.items.len() != before
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// All entries, most recent first.
    pub fn get_all(&self) -> &[T] {
        &self.items
    }

    pub fn most_recent(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: PartialEq> Default for RecencyCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_CAPACITY)
    }
}

impl<'a, T> IntoIterator for &'a RecencyCache<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_puts_newest_first() {
        let mut cache = RecencyCache::new(3);
        cache.add("a");
        cache.add("b");
        cache.add("c");
        assert_eq!(cache.get_all(), &["c", "b", "a"]);
    }

    #[test]
    fn test_readd_moves_to_front_without_growing() {
        let mut cache = RecencyCache::new(3);
        cache.add("a");
        cache.add("b");
        cache.add("c");
        assert_eq!(cache.add("a"), None);
        assert_eq!(cache.get_all(), &["a", "c", "b"]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let mut cache = RecencyCache::new(2);
        cache.add(1);
        cache.add(2);
        assert_eq!(cache.add(3), Some(1));
        assert_eq!(cache.get_all(), &[3, 2]);
    }

    #[test]
    fn test_default_capacity_is_nine() {
        let mut cache = RecencyCache::default();
        for i in 0..20 {
            cache.add(i);
        }
        assert_eq!(cache.len(), 9);
        assert_eq!(cache.most_recent(), Some(&19));
        assert_eq!(cache.get_all().last(), Some(&11));
    }

    #[test]
    fn test_zero_capacity_stays_empty() {
        let mut cache = RecencyCache::new(0);
        assert_eq!(cache.add("x"), Some("x"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_from_ordered_dedups_and_truncates() {
        let cache = RecencyCache::from_ordered(3, ["a", "b", "a", "c", "d"]);
        assert_eq!(cache.get_all(), &["a", "b", "c"]);
    }

    #[test]
    fn test_remove() {
        let mut cache = RecencyCache::new(4);
        cache.add("a");
        cache.add("b");
        assert!(cache.remove(&"a"));
        assert!(!cache.remove(&"a"));
        assert_eq!(cache.get_all(), &["b"]);
    }
}
