use crate::arena::{Arena, Node};
use crate::entry::{CacheEntry, CachedResponse};
use ahash::RandomState;
use std::collections::HashMap;
use std::sync::Arc;

/// Default global bound on cached body bytes: 1 GiB.
pub const DEFAULT_MAX_SIZE_BYTES: usize = 1024 * 1024 * 1024;

/// Snapshot of store statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub stale_hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    pub removals: u64,
    pub entries: usize,
    pub total_bytes: usize,
    pub max_bytes: usize,
}

/// Outcome of classifying a key at a point in time.
pub enum Lookup {
    /// Entry exists and is fresh; it has been promoted to most recently used.
    Fresh(Arc<CachedResponse>),
    /// Entry exists but is past its expiry. The snapshot is returned so the
    /// caller can build a conditional request; recency is untouched until a
    /// successful revalidation or overwrite.
    Stale(Arc<CachedResponse>),
    Miss,
}

/// Byte-bounded LRU store for cached HTTP responses.
///
/// Composition: an ahash-keyed index for O(1) lookup, an arena-allocated
/// doubly linked list for O(1) recency maintenance, and a running byte total
/// over response bodies. Eviction pops the least-recently-used head until the
/// total is back under the bound, synchronously, before any mutating call
/// returns.
///
/// Eviction is by recency only: a fresh entry that has not been touched
/// recently is evicted before a stale but recently-touched one.
pub struct CacheStore {
    arena: Arena,
    map: HashMap<String, u32, RandomState>,
    total_bytes: usize,
    max_bytes: usize,
    hits: u64,
    stale_hits: u64,
    misses: u64,
    insertions: u64,
    evictions: u64,
    removals: u64,
}

impl CacheStore {
    pub fn new(max_bytes: usize) -> Self {
        assert!(max_bytes > 0, "cache size bound must be > 0");
        Self {
            arena: Arena::new(),
            map: HashMap::with_hasher(RandomState::new()),
            total_bytes: 0,
            max_bytes,
            hits: 0,
            stale_hits: 0,
            misses: 0,
            insertions: 0,
            evictions: 0,
            removals: 0,
        }
    }

    /// Look up an entry without touching recency or counters.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        let &index = self.map.get(key)?;
        self.arena.get(index).map(|node| &node.entry)
    }

    /// Promote an entry to most recently used. No-op (and `false`) if absent.
    pub fn touch(&mut self, key: &str) -> bool {
        if let Some(&index) = self.map.get(key) {
            self.arena.move_to_tail(index);
            true
        } else {
            false
        }
    }

    /// Classify `key` at `now_ms`, updating counters and promoting fresh hits.
    pub fn lookup(&mut self, key: &str, now_ms: i64) -> Lookup {
        let Some(&index) = self.map.get(key) else {
            self.misses += 1;
            return Lookup::Miss;
        };

        let node = self.arena.get(index).unwrap();
        if node.entry.is_fresh(now_ms) {
            self.hits += 1;
            self.arena.move_to_tail(index);
            let node = self.arena.get(index).unwrap();
            Lookup::Fresh(Arc::clone(&node.entry.response))
        } else {
            self.stale_hits += 1;
            Lookup::Stale(Arc::clone(&node.entry.response))
        }
    }

    /// Insert or overwrite the entry for `key`.
    ///
    /// An existing entry is replaced in place and re-promoted; a new one is
    /// inserted at the most-recently-used tail. Either way the byte total is
    /// adjusted and eviction runs before returning.
    pub fn put(
        &mut self,
        key: String,
        response: CachedResponse,
        expires_at: i64,
    ) -> Arc<CachedResponse> {
        let response = Arc::new(response);

        if let Some(&index) = self.map.get(&key) {
            let node = self.arena.get_mut(index).unwrap();
            self.total_bytes -= node.entry.size_bytes;
            let size = node.entry.replace(Arc::clone(&response), expires_at);
            self.total_bytes += size;
            self.arena.move_to_tail(index);
        } else {
            let entry = CacheEntry::new(key.clone(), Arc::clone(&response), expires_at);
            let size = entry.size_bytes;
            let index = self.arena.push_tail(Node::new(entry));
            self.map.insert(key, index);
            self.total_bytes += size;
            self.insertions += 1;
        }

        self.evict_until_within_bound();
        response
    }

    /// Remove the entry for `key`. No-op (and `false`) if absent.
    pub fn remove(&mut self, key: &str) -> bool {
        if let Some(index) = self.map.remove(key) {
            if let Some(node) = self.arena.remove(index) {
                self.total_bytes -= node.entry.size_bytes;
            }
            self.removals += 1;
            true
        } else {
            false
        }
    }

    /// Evict least-recently-used entries until `total_bytes < max_bytes`.
    /// Terminates: every pop strictly shrinks the total or empties the store.
    pub fn evict_until_within_bound(&mut self) {
        while self.total_bytes >= self.max_bytes {
            let Some((_, node)) = self.arena.pop_head() else {
                break;
            };
            self.total_bytes -= node.entry.size_bytes;
            self.map.remove(&node.entry.key);
            self.evictions += 1;
            tracing::debug!(
                key = %node.entry.key,
                size = node.entry.size_bytes,
                total = self.total_bytes,
                "evicted least recently used entry"
            );
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.arena = Arena::new();
        self.map.clear();
        self.total_bytes = 0;
    }

    /// Read-only copy of the cache contents. Internal linkage is never
    /// exposed; the shared response snapshots are immutable.
    pub fn snapshot(&self) -> HashMap<String, Arc<CachedResponse>> {
        self.map
            .iter()
            .map(|(key, &index)| {
                let node = self.arena.get(index).unwrap();
                (key.clone(), Arc::clone(&node.entry.response))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            stale_hits: self.stale_hits,
            misses: self.misses,
            insertions: self.insertions,
            evictions: self.evictions,
            removals: self.removals,
            entries: self.arena.len(),
            total_bytes: self.total_bytes,
            max_bytes: self.max_bytes,
        }
    }

    #[cfg(test)]
    fn keys_lru_to_mru(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.arena.len());
        let mut index = self.arena.head;
        while index != crate::arena::NIL {
            let node = self.arena.get(index).unwrap();
            keys.push(node.entry.key.clone());
            index = node.next;
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode};

    const FOREVER: i64 = i64::MAX;

    fn resp(body: &str) -> CachedResponse {
        CachedResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::copy_from_slice(body.as_bytes()),
            uri: "http://origin/".to_string(),
        }
    }

    fn resp_of_len(len: usize) -> CachedResponse {
        CachedResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from(vec![b'x'; len]),
            uri: "http://origin/".to_string(),
        }
    }

    #[test]
    fn basic_put_and_get() {
        let mut store = CacheStore::new(1024);
        store.put("GET:/a".into(), resp("aaa"), FOREVER);

        let entry = store.get("GET:/a").unwrap();
        assert_eq!(entry.size_bytes, 3);
        assert_eq!(entry.response.body, Bytes::from_static(b"aaa"));
        assert!(store.get("GET:/b").is_none());
        assert_eq!(store.total_bytes(), 3);
    }

    #[test]
    fn lookup_classifies_fresh_stale_miss() {
        let mut store = CacheStore::new(1024);
        store.put("fresh".into(), resp("f"), 2_000);
        store.put("stale".into(), resp("s"), 1_000);

        assert!(matches!(store.lookup("fresh", 1_500), Lookup::Fresh(_)));
        // expires_at <= now means stale, boundary included
        assert!(matches!(store.lookup("stale", 1_000), Lookup::Stale(_)));
        assert!(matches!(store.lookup("absent", 1_500), Lookup::Miss));

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.stale_hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn fresh_lookup_promotes_to_mru() {
        let mut store = CacheStore::new(1024);
        store.put("a".into(), resp("1"), FOREVER);
        store.put("b".into(), resp("2"), FOREVER);
        store.put("c".into(), resp("3"), FOREVER);

        store.lookup("a", 0);
        assert_eq!(store.keys_lru_to_mru(), vec!["b", "c", "a"]);
    }

    #[test]
    fn stale_lookup_leaves_recency_alone() {
        let mut store = CacheStore::new(1024);
        store.put("a".into(), resp("1"), 10);
        store.put("b".into(), resp("2"), FOREVER);

        store.lookup("a", 100);
        assert_eq!(store.keys_lru_to_mru(), vec!["a", "b"]);
    }

    #[test]
    fn touch_is_idempotent_at_tail() {
        let mut store = CacheStore::new(1024);
        store.put("a".into(), resp("1"), FOREVER);
        store.put("b".into(), resp("2"), FOREVER);

        assert!(store.touch("b"));
        assert!(store.touch("b"));
        assert_eq!(store.keys_lru_to_mru(), vec!["a", "b"]);
        assert!(!store.touch("ghost"));
    }

    #[test]
    fn eviction_removes_lru_first() {
        // Bound of 10: three 4-byte bodies overflow after the third put
        let mut store = CacheStore::new(10);
        store.put("a".into(), resp("aaaa"), FOREVER);
        store.put("b".into(), resp("bbbb"), FOREVER);

        // Touch "a" so "b" is the LRU victim
        store.touch("a");
        store.put("c".into(), resp("cccc"), FOREVER);

        assert!(store.get("b").is_none());
        assert!(store.get("a").is_some());
        assert!(store.get("c").is_some());
        assert!(store.total_bytes() < store.max_bytes());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn bound_holds_after_any_put_sequence() {
        let mut store = CacheStore::new(100);
        for i in 0..50 {
            store.put(format!("k{i}"), resp_of_len(7 + i % 13), FOREVER);
            assert!(store.total_bytes() < store.max_bytes());
        }
        let stats = store.stats();
        assert_eq!(stats.total_bytes, store.total_bytes());
        assert!(stats.evictions > 0);
    }

    #[test]
    fn oversized_body_empties_the_store() {
        let mut store = CacheStore::new(10);
        store.put("small".into(), resp("ok"), FOREVER);
        store.put("huge".into(), resp_of_len(64), FOREVER);

        // Nothing can stay: even the new entry exceeds the bound
        assert!(store.is_empty());
        assert_eq!(store.total_bytes(), 0);
    }

    #[test]
    fn replace_in_place_adjusts_bytes_and_recency() {
        let mut store = CacheStore::new(1024);
        store.put("a".into(), resp_of_len(100), FOREVER);
        store.put("b".into(), resp("bb"), FOREVER);

        store.put("a".into(), resp_of_len(10), 42);

        assert_eq!(store.len(), 2);
        assert_eq!(store.total_bytes(), 12);
        let entry = store.get("a").unwrap();
        assert_eq!(entry.expires_at, 42);
        assert_eq!(entry.size_bytes, 10);
        // Overwrite counts as a use
        assert_eq!(store.keys_lru_to_mru(), vec!["b", "a"]);
        assert_eq!(store.stats().insertions, 2);
    }

    #[test]
    fn remove_and_clear() {
        let mut store = CacheStore::new(1024);
        store.put("a".into(), resp("aaa"), FOREVER);
        store.put("b".into(), resp("bbb"), FOREVER);

        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert_eq!(store.total_bytes(), 3);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.total_bytes(), 0);
        assert!(store.get("b").is_none());
    }

    #[test]
    fn snapshot_is_a_defensive_copy() {
        let mut store = CacheStore::new(1024);
        store.put("a".into(), resp("aaa"), FOREVER);
        store.put("b".into(), resp("bbb"), FOREVER);

        let snap = store.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap["a"].body, Bytes::from_static(b"aaa"));

        // Mutating the store afterward does not disturb the snapshot
        store.remove("a");
        assert_eq!(snap["a"].body, Bytes::from_static(b"aaa"));
    }

    #[test]
    fn eviction_ignores_ttl() {
        let mut store = CacheStore::new(10);
        // "stale" is long expired but recently touched; "fresh" is the LRU
        store.put("fresh".into(), resp("ffff"), FOREVER);
        store.put("stale".into(), resp("ssss"), 0);
        store.touch("stale");
        store.touch("fresh");
        store.touch("stale");

        store.put("new".into(), resp("nnnn"), FOREVER);

        // Recency decides, not freshness: "fresh" was the oldest by touch
        assert!(store.get("fresh").is_none());
        assert!(store.get("stale").is_some());
    }
}
