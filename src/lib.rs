//! An in-process, multi-source exact-substring search engine.
//!
//! Callers register named text sources with [`Engine::add_source`], then
//! query for verbatim substring occurrences with [`Engine::search`]. A
//! query of three or more words is answered by a hybrid planner: interior
//! words are looked up in a word-hash index to find a small candidate set,
//! which is then verified character-by-character against the source text.
//! Shorter queries and non-indexable sources fall back to a full
//! Knuth-Morris-Pratt scan.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod kmp;
pub mod query;
pub mod reader;
pub mod source;
pub mod tokenizer;
pub mod word_index;

pub use cache::SearchResult;
pub use config::Config;
pub use engine::Engine;
pub use error::SearchError;
pub use source::SourceInput;
