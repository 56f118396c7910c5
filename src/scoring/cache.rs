// In-memory score cache.
// Keyed by user identity with TTL expiry, a capacity bound, and clear generations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::profile::UserKey;
use super::result::UnifiedScoreResult;

/// Default TTL for scores: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CAPACITY: usize = 32;

/// A cached score with the time it was stored.
///
/// Age is measured on the monotonic clock. `data.fetched_at` is for display only.
#[derive(Debug, Clone)]
pub struct CachedScore {
    pub data: Arc<UnifiedScoreResult>,
    pub cached_at: Instant,
}

impl CachedScore {
    pub fn new(data: Arc<UnifiedScoreResult>) -> Self {
        Self {
            data,
            cached_at: Instant::now(),
        }
    }

    /// Valid while strictly younger than the TTL.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() >= ttl
    }

    pub fn is_valid(&self, ttl: Duration) -> bool {
        !self.is_expired(ttl)
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<UserKey, CachedScore>,
    generation: u64,
}

/// Score cache shared by every consumer of the scoring service.
#[derive(Debug)]
pub struct ScoreCache {
    ttl: Duration,
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl ScoreCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Valid entry for a key. Expired entries are dropped on read.
    pub fn get(&self, key: &UserKey) -> Option<Arc<UnifiedScoreResult>> {
        let mut inner = self.inner.lock();
        let entry = inner.entries.get(key)?;
        if entry.is_valid(self.ttl) {
            return Some(Arc::clone(&entry.data));
        }
        inner.entries.remove(key);
        None
    }

    /// Store a result, replacing any previous entry for the key.
    pub fn insert(&self, key: UserKey, data: Arc<UnifiedScoreResult>) {
        let mut inner = self.inner.lock();
        self.insert_locked(&mut inner, key, data);
    }

    /// Store a result only if no clear happened since `generation` was read.
    pub fn insert_if_current(
        &self,
        key: UserKey,
        data: Arc<UnifiedScoreResult>,
        generation: u64,
    ) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return false;
        }
        self.insert_locked(&mut inner, key, data);
        true
    }

    fn insert_locked(&self, inner: &mut CacheInner, key: UserKey, data: Arc<UnifiedScoreResult>) {
        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            let ttl = self.ttl;
            inner.entries.retain(|_, entry| entry.is_valid(ttl));
            if inner.entries.len() >= self.capacity {
                let oldest = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.cached_at)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    inner.entries.remove(&oldest);
                }
            }
        }
        inner.entries.insert(key, CachedScore::new(data));
    }

    /// Current clear generation.
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Drop every entry and invalidate writes from fetches started earlier.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move an entry's timestamp into the past.
    #[cfg(test)]
    pub(crate) fn backdate(&self, key: &UserKey, by: Duration) {
        if let Some(entry) = self.inner.lock().entries.get_mut(key) {
            entry.cached_at = entry
                .cached_at
                .checked_sub(by)
                .expect("monotonic clock too close to its origin");
        }
    }
}
