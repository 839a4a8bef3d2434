//! Engine-wide configuration: size limits and cache policy.

use serde::{Deserialize, Serialize};

/// Default ceiling (in bytes) below which a source's content may be cached
/// fully decoded in memory, and below which a source is tokenized into the
/// word index. Both default to 10,000,000 per the documented contract.
const DEFAULT_LOAD_TO_MEMORY_LIMIT: u64 = 10_000_000;
const DEFAULT_BUILD_INDEX_LIMIT: u64 = 10_000_000;

const ENV_LOAD_TO_MEMORY_LIMIT: &str = "SEARCH_LOAD_TO_MEMORY_LIMIT";
const ENV_BUILD_INDEX_LIMIT: &str = "SEARCH_BUILD_INDEX_LIMIT";
const ENV_CACHE_ENABLED: &str = "SEARCH_CACHE_ENABLED";

/// Configuration for source ingest policy and query result caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    load_to_memory_limit: u64,
    build_index_limit: u64,
    cache_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load_to_memory_limit: DEFAULT_LOAD_TO_MEMORY_LIMIT,
            build_index_limit: DEFAULT_BUILD_INDEX_LIMIT,
            cache_enabled: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with explicit limits and cache policy.
    #[must_use]
    pub const fn new(load_to_memory_limit: u64, build_index_limit: u64, cache_enabled: bool) -> Self {
        Self {
            load_to_memory_limit,
            build_index_limit,
            cache_enabled,
        }
    }

    /// Reads configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> T {
            std::env::var(name)
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(default)
        }

        Self {
            load_to_memory_limit: parse_env_var(
                ENV_LOAD_TO_MEMORY_LIMIT,
                DEFAULT_LOAD_TO_MEMORY_LIMIT,
            ),
            build_index_limit: parse_env_var(ENV_BUILD_INDEX_LIMIT, DEFAULT_BUILD_INDEX_LIMIT),
            cache_enabled: parse_env_var(ENV_CACHE_ENABLED, true),
        }
    }

    /// Byte-length ceiling for caching a source's decoded content in memory.
    #[must_use]
    pub const fn load_to_memory_limit(&self) -> u64 {
        self.load_to_memory_limit
    }

    /// Byte-length ceiling for tokenizing a source into the word index.
    #[must_use]
    pub const fn build_index_limit(&self) -> u64 {
        self.build_index_limit
    }

    /// Whether the query result cache is active.
    #[must_use]
    pub const fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Sets the load-to-memory limit, preserving other settings.
    #[must_use]
    pub const fn with_load_to_memory_limit(mut self, limit: u64) -> Self {
        self.load_to_memory_limit = limit;
        self
    }

    /// Sets the build-index limit, preserving other settings.
    #[must_use]
    pub const fn with_build_index_limit(mut self, limit: u64) -> Self {
        self.build_index_limit = limit;
        self
    }

    /// Sets the cache policy, preserving other settings.
    #[must_use]
    pub const fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}
