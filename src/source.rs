//! Registered sources: policy-gated content access with a soft-reclaimable
//! decode cache.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::SearchError;
use crate::reader::{ByteCharReader, CharReader, StrCharReader};

/// Where a source's bytes live.
#[derive(Debug, Clone)]
pub enum SourceInput {
    /// Bytes already resident in memory (e.g. from a test fixture or an
    /// upload buffer already read into a `Vec<u8>` by the caller).
    Bytes(Arc<[u8]>),
    /// A path to re-open on every streamed read.
    Path(PathBuf),
}

impl SourceInput {
    fn byte_len(&self) -> Result<u64, SearchError> {
        match self {
            Self::Bytes(b) => Ok(b.len() as u64),
            Self::Path(p) => std::fs::metadata(p)
                .map(|m| m.len())
                .map_err(|e| io_error(p, e)),
        }
    }

    fn open_bytes(&self) -> Result<Box<dyn Read + Send>, SearchError> {
        match self {
            Self::Bytes(b) => Ok(Box::new(Cursor::new(Arc::clone(b)))),
            Self::Path(p) => {
                let file = File::open(p).map_err(|e| io_error(p, e))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SearchError {
    SearchError::Io {
        path: path.display().to_string(),
        message: source.to_string(),
        source,
    }
}

/// A registered text, with policies computed once at registration time.
///
/// Policies never change after construction (spec §4.3: "Policies are
/// immutable per Source"). The decoded-content cache is the one piece of
/// interior mutability, guarded by double-checked `RwLock` locking so
/// concurrent readers of already-cached content never serialize on each
/// other.
#[derive(Debug)]
pub struct Source {
    name: Box<str>,
    input: SourceInput,
    byte_len: u64,
    char_len: usize,
    loadable: bool,
    indexable: bool,
    cache: RwLock<Option<Arc<str>>>,
}

impl Source {
    /// Registers a new source, computing its policies from `config` and
    /// decoding once to determine `char_len`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptySource`] for a zero-byte source, or
    /// [`SearchError::Io`]/[`SearchError::Utf8`] if the bytes cannot be
    /// read or decoded.
    pub fn new(
        name: &str,
        input: SourceInput,
        load_to_memory_limit: u64,
        build_index_limit: u64,
    ) -> Result<Self, SearchError> {
        let byte_len = input.byte_len()?;
        if byte_len == 0 {
            return Err(SearchError::EmptySource(name.to_string()));
        }

        let loadable = byte_len <= load_to_memory_limit;
        let indexable = byte_len <= build_index_limit;
        let char_len = count_chars(&input, name)?;

        Ok(Self {
            name: Box::from(name),
            input,
            byte_len,
            char_len,
            loadable,
            indexable,
            cache: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn byte_len(&self) -> u64 {
        self.byte_len
    }

    #[must_use]
    pub const fn char_len(&self) -> usize {
        self.char_len
    }

    #[must_use]
    pub const fn is_loadable(&self) -> bool {
        self.loadable
    }

    #[must_use]
    pub const fn is_indexable(&self) -> bool {
        self.indexable
    }

    /// A fresh character reader over the full content, re-opened from the
    /// underlying handle (never the cache).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] if the handle cannot be (re-)opened.
    pub fn open_reader(&self) -> Result<Box<dyn CharReader + Send>, SearchError> {
        let bytes = self.input.open_bytes()?;
        Ok(Box::new(ByteCharReader::new(BufReader::new(bytes))))
    }

    /// Returns the cached decoded string, decoding (and caching) on first
    /// access. Legal only when `is_loadable()`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the source isn't loadable, or an
    /// I/O or UTF-8 error if decoding fails.
    pub fn read_full_string(&self) -> Result<Arc<str>, SearchError> {
        if !self.loadable {
            return Err(SearchError::Config(format!(
                "source '{}' exceeds load_to_memory_limit",
                self.name
            )));
        }

        if let Some(cached) = self.cache.read().expect("cache lock poisoned").as_ref() {
            return Ok(Arc::clone(cached));
        }

        let mut guard = self.cache.write().expect("cache lock poisoned");
        if let Some(cached) = guard.as_ref() {
            return Ok(Arc::clone(cached));
        }

        let decoded = self.decode_all()?;
        *guard = Some(Arc::clone(&decoded));
        Ok(decoded)
    }

    /// Drops the cached decoded string, if any. The next `read_full_string`
    /// call re-decodes. Models the soft-reclaim contract in lieu of a true
    /// soft reference.
    pub fn reclaim_cache(&self) {
        *self.cache.write().expect("cache lock poisoned") = None;
    }

    /// Returns the character range `[from, from + length)`, clamped to the
    /// source's bounds.
    ///
    /// # Errors
    ///
    /// Returns an I/O or UTF-8 error if the content must be (re-)read and
    /// that read fails.
    pub fn read_slice(&self, from: usize, length: usize) -> Result<String, SearchError> {
        let from = from.min(self.char_len);
        let end = from.saturating_add(length).min(self.char_len);

        if self.loadable {
            let full = self.read_full_string()?;
            return Ok(full.chars().skip(from).take(end - from).collect());
        }

        let mut reader = self.open_reader()?;
        reader.skip(from).map_err(|e| self.io_err(e))?;
        let mut out = String::with_capacity(end - from);
        for _ in from..end {
            match reader.next_char().map_err(|e| self.io_err(e))? {
                Some(c) => out.push(c),
                None => break,
            }
        }
        Ok(out)
    }

    /// Returns a fresh byte stream over the full source content, for
    /// `get_source`-style raw download.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Io`] if the handle cannot be (re-)opened.
    pub fn open_byte_reader(&self) -> Result<Box<dyn Read + Send>, SearchError> {
        self.input.open_bytes()
    }

    fn decode_all(&self) -> Result<Arc<str>, SearchError> {
        let mut bytes = Vec::with_capacity(self.byte_len as usize);
        self.input
            .open_bytes()?
            .read_to_end(&mut bytes)
            .map_err(|e| self.io_err(e))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            let byte = e.utf8_error().valid_up_to();
            SearchError::Utf8 {
                name: self.name.to_string(),
                byte,
                source: e.utf8_error(),
            }
        })?;
        Ok(Arc::from(text))
    }

    fn io_err(&self, source: std::io::Error) -> SearchError {
        SearchError::Io {
            path: self.name.to_string(),
            message: source.to_string(),
            source,
        }
    }
}

fn count_chars(input: &SourceInput, name: &str) -> Result<usize, SearchError> {
    let bytes = input.open_bytes()?;
    let mut reader = ByteCharReader::new(BufReader::new(bytes));
    let mut count = 0usize;
    while reader
        .next_char()
        .map_err(|e| SearchError::Io {
            path: name.to_string(),
            message: e.to_string(),
            source: e,
        })?
        .is_some()
    {
        count += 1;
    }
    Ok(count)
}

/// Produces an in-memory `CharReader` over a loaded source's content, for
/// callers that already hold the `Arc<str>` (avoids a second open/decode).
#[must_use]
pub fn str_reader(content: &Arc<str>) -> StrCharReader {
    StrCharReader::new(Arc::clone(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_source(name: &str, content: &str) -> Source {
        Source::new(
            name,
            SourceInput::Bytes(Arc::from(content.as_bytes())),
            10_000_000,
            10_000_000,
        )
        .unwrap()
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = Source::new("empty", SourceInput::Bytes(Arc::from(&b""[..])), 10, 10);
        assert!(matches!(err, Err(SearchError::EmptySource(_))));
    }

    #[test]
    fn policies_follow_byte_length_thresholds() {
        let source = Source::new(
            "s",
            SourceInput::Bytes(Arc::from(&b"hello"[..])),
            3,
            100,
        )
        .unwrap();
        assert!(!source.is_loadable());
        assert!(source.is_indexable());
    }

    #[test]
    fn read_full_string_caches_and_reclaims() {
        let source = bytes_source("s", "hello world");
        let first = source.read_full_string().unwrap();
        assert_eq!(&*first, "hello world");
        source.reclaim_cache();
        let second = source.read_full_string().unwrap();
        assert_eq!(&*second, "hello world");
    }

    #[test]
    fn read_slice_clamps_to_bounds() {
        let source = bytes_source("s", "hello world");
        assert_eq!(source.read_slice(6, 100).unwrap(), "world");
        assert_eq!(source.read_slice(100, 5).unwrap(), "");
    }

    #[test]
    fn char_len_counts_code_points_not_bytes() {
        let source = bytes_source("s", "héllo");
        assert_eq!(source.char_len(), 5);
        assert_eq!(source.byte_len(), 6);
    }
}
