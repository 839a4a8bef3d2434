//! Structured error types for the search engine.

use std::io;
use thiserror::Error;

/// Errors raised by the engine's mutating and read APIs.
///
/// `search`, `get_slice`, `get_source`, and `list_names` are infallible at
/// the type level: an unknown source or a too-short query is a validation
/// miss, not an error (see the module docs on `Engine`).
#[derive(Error, Debug)]
pub enum SearchError {
    /// `add_source` was called with a name already present in the registry.
    #[error("source '{0}' is already registered")]
    DuplicateSource(String),

    /// `add_source` was called with a zero-byte source.
    #[error("source '{0}' is empty")]
    EmptySource(String),

    /// The underlying byte handle failed to read during ingest or a read API.
    #[error("I/O at {path}: {message}")]
    Io {
        path: String,
        message: String,
        #[source]
        source: io::Error,
    },

    /// The source's bytes are not valid UTF-8.
    #[error("invalid UTF-8 in source '{name}' at byte {byte}")]
    Utf8 {
        name: String,
        byte: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A `Source` operation was attempted that its policy forbids, e.g.
    /// `read_full_string` on a source whose load-policy is false.
    #[error("invalid configuration: {0}")]
    Config(String),
}
