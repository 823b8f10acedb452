//! TTL-bounded read cache for listing queries.
//!
//! Keys are a logical query name plus the serialized arguments; values
//! expire a fixed freshness window after insertion. Concurrent misses
//! for the same key may each run the underlying query; the last insert
//! wins and both callers still return usable data.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

pub struct TtlCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value if present and still fresh.
    /// Expired entries are dropped on the way out.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: T) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };

        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.into(), entry);
    }

    pub fn invalidate(&self, key: &str) {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .remove(key);
    }

    /// Tag-style invalidation: drops every key under the given prefix.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .retain(|key, _| !key.starts_with(prefix));
    }
}
