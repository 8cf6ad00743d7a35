//! In-memory stream URL cache with time-based freshness.
//!
//! Entries are never evicted. A URL that could not be refreshed stays in
//! the map as the last known value, but [`StreamCache::get`] reports it as
//! [`Lookup::Stale`] once the refresh interval has passed since it was
//! obtained.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// A resolved stream URL and when it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub stream_url: String,
    pub obtained_at: Instant,
}

impl CacheEntry {
    /// Fresh iff `now - obtained_at < refresh_interval`.
    #[must_use]
    pub fn is_fresh(&self, now: Instant, refresh_interval: Duration) -> bool {
        now.saturating_duration_since(self.obtained_at) < refresh_interval
    }
}

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Fresh(CacheEntry),
    Stale(CacheEntry),
    Missing,
}

impl Lookup {
    /// The stream URL, only if the entry is fresh.
    #[must_use]
    pub fn fresh_url(&self) -> Option<&str> {
        match self {
            Self::Fresh(entry) => Some(&entry.stream_url),
            Self::Stale(_) | Self::Missing => None,
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// Cloneable handle to the shared path → [`CacheEntry`] map.
///
/// One lock guards the whole map; it is held only for the map operation
/// itself, never across network I/O.
#[derive(Debug, Clone, Default)]
pub struct StreamCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl StreamCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `stream_url` for `path`, replacing any previous entry.
    pub async fn put(&self, path: &str, stream_url: impl Into<String>, now: Instant) {
        let entry = CacheEntry {
            stream_url: stream_url.into(),
            obtained_at: now,
        };
        self.entries.lock().await.insert(path.to_string(), entry);
    }

    pub async fn get(&self, path: &str, now: Instant, refresh_interval: Duration) -> Lookup {
        let entry = self.entries.lock().await.get(path).cloned();
        match entry {
            Some(entry) if entry.is_fresh(now, refresh_interval) => Lookup::Fresh(entry),
            Some(entry) => Lookup::Stale(entry),
            None => Lookup::Missing,
        }
    }

    /// Number of paths with an entry, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
