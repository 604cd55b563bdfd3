//! In-memory response cache with per-entry time-to-live.
//!
//! Entries expire lazily: nothing sweeps the map, an expired entry is
//! dropped the next time it is looked up. There is no size bound.

use regex::Regex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > self.ttl
    }
}

/// Key selector for [`TtlCache::invalidate`].
#[derive(Debug, Clone)]
pub enum CachePattern {
    /// Matches keys containing the substring.
    Literal(String),
    Regex(Regex),
}

impl CachePattern {
    fn matches(&self, key: &str) -> bool {
        match self {
            Self::Literal(s) => key.contains(s.as_str()),
            Self::Regex(re) => re.is_match(key),
        }
    }
}

impl From<&str> for CachePattern {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for CachePattern {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<Regex> for CachePattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the value unless it has outlived its ttl, in which case the
    /// entry is purged.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.data.clone()),
            None => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, data: V, ttl: Duration) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                data,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes every key matching `pattern`, returning how many went.
    pub fn invalidate(&mut self, pattern: impl Into<CachePattern>) -> usize {
        let pattern = pattern.into();
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.matches(key));
        before - self.entries.len()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}
