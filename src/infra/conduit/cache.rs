use crate::domain::{StackError, StackResult};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// Bounded memo of revisions known to exist on canonical history.
///
/// Only positive answers are stored: once a revision has landed it stays
/// landed, while a miss may turn into a hit later.
pub struct RevisionExistsCache(Mutex<LruCache<String, ()>>);

impl RevisionExistsCache {
    pub fn new(capacity: usize) -> StackResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            StackError::InvalidConfig("cache capacity must be greater than zero".into())
        })?;
        Ok(Self(Mutex::new(LruCache::new(capacity))))
    }

    /// Whether `revision` is cached. A hit refreshes its recency.
    pub fn contains(&self, revision: &str) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(revision)
            .is_some()
    }

    pub fn insert(&self, revision: &str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(revision.to_string(), ());
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RevisionExistsCache {
    fn default() -> Self {
        Self(Mutex::new(LruCache::new(
            NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )))
    }
}
