use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Bounded map whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, (V, Instant)>,
    ttl: Duration,
    max_entries: usize,
}

impl<K: Eq + Hash + Clone, V: Clone> QueryCache<K, V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self { entries: HashMap::new(), ttl, max_entries: max_entries.max(1) }
    }

    /// Fresh value for `key`. An expired entry is removed and reported as a miss.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        let (value, stored) = self.entries.get(key)?;
        if now.saturating_duration_since(*stored) >= self.ttl {
            self.entries.remove(key);
            return None;
        }
        Some(value.clone())
    }

    /// Store `value`, evicting the oldest entry when full.
    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            let oldest = self.entries.iter().min_by_key(|(_, (_, at))| *at).map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, (value, now));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire_after_ttl() {
        let mut cache = QueryCache::new(Duration::from_secs(60), 10);
        let t0 = Instant::now();
        cache.insert_at("k", 1, t0);
        assert_eq!(cache.get_at(&"k", t0 + Duration::from_secs(59)), Some(1));
        assert_eq!(cache.get_at(&"k", t0 + Duration::from_secs(60)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn oldest_entry_is_evicted_when_full() {
        let mut cache = QueryCache::new(Duration::from_secs(60), 2);
        let t0 = Instant::now();
        cache.insert_at("a", 1, t0);
        cache.insert_at("b", 2, t0 + Duration::from_secs(1));
        cache.insert_at("c", 3, t0 + Duration::from_secs(2));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at(&"a", t0 + Duration::from_secs(3)), None);
        assert_eq!(cache.get_at(&"c", t0 + Duration::from_secs(3)), Some(3));
    }

    #[test]
    fn overwriting_a_key_does_not_evict() {
        let mut cache = QueryCache::new(Duration::from_secs(60), 2);
        let t0 = Instant::now();
        cache.insert_at("a", 1, t0);
        cache.insert_at("b", 2, t0);
        cache.insert_at("a", 10, t0);
        assert_eq!(cache.get_at(&"a", t0), Some(10));
        assert_eq!(cache.get_at(&"b", t0), Some(2));
    }
}
