//! The public engine: source registry, word index, and result cache tied
//! together behind one reader/writer lock.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use hashbrown::HashMap;

use crate::cache::{ResultCache, SearchResult};
use crate::config::Config;
use crate::error::SearchError;
use crate::query;
use crate::source::{Source, SourceInput};
use crate::tokenizer::tokenize;
use crate::word_index::WordIndex;

/// Registry + index, mutated together under one write lock (spec §4.6:
/// "a single reader/writer lock protects the registry and index together").
#[derive(Debug, Default)]
struct Inner {
    registry: HashMap<String, Arc<Source>>,
    index: WordIndex,
}

/// The in-process, multi-source exact-substring search engine.
///
/// Construct one explicitly per call site or test; there is no ambient
/// singleton (spec §9: "prefer explicit construction of an engine value
/// passed to callers over ambient singletons").
#[derive(Debug)]
pub struct Engine {
    config: Config,
    inner: RwLock<Inner>,
    cache: ResultCache,
}

impl Engine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner::default()),
            cache: ResultCache::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Registers `name` with content read from `input`.
    ///
    /// Tokenization is staged into a local structure and only merged into
    /// the global index after it succeeds, and only under the write lock
    /// together with the registry insert, so a failed ingest never leaves
    /// partial state (spec §7).
    ///
    /// # Errors
    ///
    /// [`SearchError::DuplicateSource`] if `name` is already registered,
    /// [`SearchError::EmptySource`] if the source has zero bytes, or an I/O
    /// error if the bytes can't be read.
    pub fn add_source(&self, name: &str, input: SourceInput) -> Result<(), SearchError> {
        {
            let guard = self.inner.read().expect("lock poisoned");
            if guard.registry.contains_key(name) {
                return Err(SearchError::DuplicateSource(name.to_string()));
            }
        }

        let source = Source::new(
            name,
            input,
            self.config.load_to_memory_limit(),
            self.config.build_index_limit(),
        )?;

        let mut records = Vec::new();
        if source.is_indexable() {
            let mut reader = source.open_reader()?;
            tokenize(name, &mut reader, |w| records.push(w)).map_err(|e| SearchError::Io {
                path: name.to_string(),
                message: e.to_string(),
                source: e,
            })?;
        }

        let mut guard = self.inner.write().expect("lock poisoned");
        if guard.registry.contains_key(name) {
            return Err(SearchError::DuplicateSource(name.to_string()));
        }
        guard.index.merge(records);
        guard.registry.insert(name.to_string(), Arc::new(source));
        drop(guard);

        self.cache.invalidate_all();
        Ok(())
    }

    /// Searches every registered source for `query`.
    ///
    /// Memoized per distinct query string when the cache is enabled;
    /// invalidated wholesale by the next successful `add_source`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] if reading a streamed source fails.
    pub fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        if self.config.cache_enabled() {
            if let Some(cached) = self.cache.get(query) {
                return Ok(cached);
            }
        }

        let guard = self.inner.read().expect("lock poisoned");
        let result = query::search(&guard.registry, &guard.index, query)?;
        drop(guard);

        if self.config.cache_enabled() {
            self.cache.put(query, result.clone());
        }
        Ok(result)
    }

    /// Returns the character range `[from, from + length)` of `name`'s
    /// content, or `None` if no such source is registered.
    #[must_use]
    pub fn get_slice(&self, name: &str, from: usize, length: usize) -> Option<String> {
        let guard = self.inner.read().expect("lock poisoned");
        let source = guard.registry.get(name)?;
        source.read_slice(from, length).ok()
    }

    /// Returns a fresh byte stream over `name`'s raw content, or `None` if
    /// no such source is registered.
    #[must_use]
    pub fn get_source(&self, name: &str) -> Option<Box<dyn std::io::Read + Send>> {
        let guard = self.inner.read().expect("lock poisoned");
        let source = guard.registry.get(name)?;
        source.open_byte_reader().ok()
    }

    /// Returns every registered source name.
    #[must_use]
    pub fn list_names(&self) -> BTreeSet<String> {
        let guard = self.inner.read().expect("lock poisoned");
        guard.registry.keys().cloned().collect()
    }

    /// Drops the per-source decoded-content caches and the query result
    /// cache. Approximates the soft-reference contract (spec §9): both
    /// rematerialize transparently on next access.
    pub fn reclaim(&self) {
        let guard = self.inner.read().expect("lock poisoned");
        for source in guard.registry.values() {
            source.reclaim_cache();
        }
        drop(guard);
        self.cache.invalidate_all();
    }
}
