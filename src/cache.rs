//! Memoized query results, invalidated wholesale on any source mutation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

/// A search result: source name to ascending match offsets. Sources with
/// zero matches are omitted.
pub type SearchResult = BTreeMap<String, BTreeSet<usize>>;

/// Query-keyed memoization, soft-reclaimable via [`ResultCache::invalidate_all`].
///
/// Unlike a `Source`'s content cache, entries here never need double-checked
/// re-materialization on read: a cache miss just means the planner recomputes,
/// so a single `RwLock` around the whole map is sufficient (spec §4.6, §9:
/// "recompute-on-miss is not required for the query cache since callers can
/// re-query").
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<BTreeMap<String, SearchResult>>,
}

impl ResultCache {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: RwLock::new(BTreeMap::new()) }
    }

    /// Returns a clone of the cached result for `query`, if present.
    #[must_use]
    pub fn get(&self, query: &str) -> Option<SearchResult> {
        self.entries.read().expect("cache lock poisoned").get(query).cloned()
    }

    /// Stores `result` under `query`, replacing any prior entry.
    pub fn put(&self, query: &str, result: SearchResult) {
        self.entries
            .write()
            .expect("cache lock poisoned")
            .insert(query.to_string(), result);
    }

    /// Drops every cached entry. Called on every successful `add_source`.
    pub fn invalidate_all(&self) {
        self.entries.write().expect("cache lock poisoned").clear();
    }
}
