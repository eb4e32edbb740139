//! Process-wide query cache.
//!
//! Fetched collections live here, keyed by resource name. The UI layer never
//! patches a cached value after a mutation; it calls [`QueryCache::invalidate`]
//! and re-reads through [`QueryCache::get_or_fetch`], so the displayed data is
//! always exactly the last successful fetch.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Instant;

/// Resource name for the user collection.
pub const USERS_QUERY: &str = "users";

struct CachedQuery<T> {
    value: T,
    fetched_at: Instant,
}

pub struct QueryCache<T> {
    entries: HashMap<String, CachedQuery<T>>,
}

impl<T> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Cached value for `key`, if a fetch for it has succeeded since the
    /// last invalidation.
    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// When the cached value for `key` was fetched.
    pub fn fetched_at(&self, key: &str) -> Option<Instant> {
        self.entries.get(key).map(|entry| entry.fetched_at)
    }

    /// Discard the cached value for `key` so the next read fetches fresh.
    /// Returns whether anything was actually dropped.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Read through the cache: return the cached value for `key`, or run
    /// `fetch`, store its result, and return it. A failed fetch stores
    /// nothing, so the next read retries.
    pub fn get_or_fetch<E, F>(&mut self, key: &str, fetch: F) -> std::result::Result<&T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
    {
        let entry = match self.entries.entry(key.to_string()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => vacant.insert(CachedQuery {
                value: fetch()?,
                fetched_at: Instant::now(),
            }),
        };
        Ok(&entry.value)
    }
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type FetchResult = Result<Vec<u32>, &'static str>;

    #[test]
    fn get_or_fetch_fetches_once_until_invalidated() {
        let mut cache: QueryCache<Vec<u32>> = QueryCache::new();
        let mut fetches = 0;

        let first = cache
            .get_or_fetch(USERS_QUERY, || -> FetchResult {
                fetches += 1;
                Ok(vec![1, 2])
            })
            .unwrap()
            .clone();
        assert_eq!(first, vec![1, 2]);

        // Served from the cache; the closure must not run again.
        cache
            .get_or_fetch(USERS_QUERY, || -> FetchResult {
                fetches += 1;
                Ok(vec![9])
            })
            .unwrap();
        assert_eq!(fetches, 1);

        assert!(cache.invalidate(USERS_QUERY));
        let third = cache
            .get_or_fetch(USERS_QUERY, || -> FetchResult {
                fetches += 1;
                Ok(vec![3])
            })
            .unwrap()
            .clone();
        assert_eq!(fetches, 2);
        assert_eq!(third, vec![3]);
    }

    #[test]
    fn failed_fetch_stores_nothing() {
        let mut cache: QueryCache<Vec<u32>> = QueryCache::new();
        let result = cache.get_or_fetch(USERS_QUERY, || -> FetchResult { Err("down") });
        assert_eq!(result.unwrap_err(), "down");
        assert!(cache.get(USERS_QUERY).is_none());

        // Next read retries and can succeed.
        let value = cache
            .get_or_fetch(USERS_QUERY, || -> FetchResult { Ok(vec![5]) })
            .unwrap();
        assert_eq!(*value, vec![5]);
    }

    #[test]
    fn invalidate_on_empty_cache_reports_false() {
        let mut cache: QueryCache<u8> = QueryCache::new();
        assert!(!cache.invalidate(USERS_QUERY));
    }
}
