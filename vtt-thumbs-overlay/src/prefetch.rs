//! Process-wide cache of sprite images that have already been prefetched

use std::collections::HashSet;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

static SHARED: LazyLock<Arc<ImagePrefetchCache>> =
    LazyLock::new(|| Arc::new(ImagePrefetchCache::new()));

/// Remembers every image URL that has been handed to a loader.
///
/// Entries are never evicted. Inserts are the only mutation, so concurrent
/// touches of the same URL trigger at most one load.
#[derive(Debug, Default)]
pub struct ImagePrefetchCache {
    seen: Mutex<HashSet<String>>,
}

impl ImagePrefetchCache {
    /// Creates an empty cache, independent of the shared one
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by all overlays in this process
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Calls `load` the first time `url` is seen. Returns whether it did.
    pub fn touch(&self, url: &str, load: impl FnOnce(&str)) -> bool {
        let inserted = {
            let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
            seen.insert(url.to_string())
        };

        if inserted {
            load(url);
        }
        inserted
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
