use std::collections::{HashSet, VecDeque};

use parking_lot::Mutex;

/// Default number of filenames remembered as unparsable.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Bounded memo of filenames that previously failed to parse.
///
/// Announce feeds repeat the same unwanted releases for days; remembering
/// them skips re-extraction and, more importantly, the show lookup. Entries
/// are keyed by the original, unstripped filename. The cache holds at most
/// `capacity` names, evicting in insertion order once full, so a long-lived
/// process cannot grow without bound. All operations take the one internal
/// mutex; two threads racing on the same unseen name may both extract once,
/// which is acceptable, but an insert is never lost.
#[derive(Debug)]
pub struct UnparseableCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    seen: HashSet<String>,
    order: VecDeque<String>,
}

impl UnparseableCache {
    /// Creates a cache remembering at most `capacity` filenames. A capacity
    /// of zero is clamped to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Whether `file_name` previously failed to parse.
    #[must_use]
    pub fn contains(&self, file_name: &str) -> bool {
        self.inner.lock().seen.contains(file_name)
    }

    /// Records `file_name` as unparsable, evicting the oldest entry when
    /// the capacity is exceeded. Re-inserting a known name is a no-op and
    /// does not refresh its position.
    pub fn insert(&self, file_name: &str) {
        let mut inner = self.inner.lock();
        if !inner.seen.insert(file_name.to_owned()) {
            return;
        }
        inner.order.push_back(file_name.to_owned());
        if inner.order.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.seen.remove(&evicted);
            }
        }
    }

    /// Forgets every remembered filename.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.seen.clear();
        inner.order.clear();
    }

    /// Number of remembered filenames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    /// Whether nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for UnparseableCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_contains() {
        let cache = UnparseableCache::default();
        assert!(!cache.contains("some name"));
        cache.insert("some name");
        assert!(cache.contains("some name"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn duplicate_insert_does_not_grow() {
        let cache = UnparseableCache::default();
        cache.insert("some name");
        cache.insert("some name");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn eviction_is_first_in_first_out() {
        let cache = UnparseableCache::with_capacity(2);
        cache.insert("a");
        cache.insert("b");
        cache.insert("c");
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let cache = UnparseableCache::with_capacity(0);
        cache.insert("a");
        assert!(cache.contains("a"));
        cache.insert("b");
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn clear_forgets_everything() {
        let cache = UnparseableCache::default();
        cache.insert("a");
        cache.insert("b");
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }

    #[test]
    fn concurrent_inserts_are_not_lost() {
        let cache = UnparseableCache::default();
        std::thread::scope(|scope| {
            for t in 0..4 {
                let cache = &cache;
                scope.spawn(move || {
                    for i in 0..100 {
                        cache.insert(&format!("name-{t}-{i}"));
                    }
                });
            }
        });
        assert_eq!(cache.len(), 400);
    }
}
