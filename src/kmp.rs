//! Knuth-Morris-Pratt exact substring search.
//!
//! Precomputes the partial-failure table in O(m), then scans in O(n + m).
//! Both the in-memory and streamed entry points share the same failure
//! table and the same reset rule (`k = failure[m - 1]` on a match), so
//! self-overlapping patterns report overlapping matches (`"aa"` in
//! `"aaa"` yields `{0, 1}`).

use crate::reader::CharReader;

/// A compiled search pattern: its characters and failure table.
#[derive(Debug, Clone)]
pub struct Pattern {
    chars: Vec<char>,
    failure: Vec<usize>,
}

impl Pattern {
    /// Compiles `pattern` into its character sequence and failure table.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let failure = build_failure_table(&chars);
        Self { chars, failure }
    }

    /// Pattern length in code points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the pattern is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Searches `text` in memory, returning ascending match start offsets.
    #[must_use]
    pub fn search_str(&self, text: &[char]) -> Vec<usize> {
        let mut matches = Vec::new();
        if self.is_empty() || text.len() < self.chars.len() {
            return matches;
        }

        let m = self.chars.len();
        let mut k = 0usize;
        for (i, &c) in text.iter().enumerate() {
            while k > 0 && self.chars[k] != c {
                k = self.failure[k - 1];
            }
            if self.chars[k] == c {
                k += 1;
            }
            if k == m {
                matches.push(i + 1 - m);
                k = self.failure[m - 1];
            }
        }
        matches
    }

    /// Searches a character reader, returning ascending match start
    /// offsets relative to the start of the stream. Buffer boundaries
    /// are transparent: only the `k` failure-state variable is carried
    /// between characters, so no explicit carry-buffer is needed.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from `reader`.
    pub fn search_reader(&self, reader: &mut dyn CharReader) -> std::io::Result<Vec<usize>> {
        let mut matches = Vec::new();
        if self.is_empty() {
            return Ok(matches);
        }

        let m = self.chars.len();
        let mut k = 0usize;
        let mut i = 0usize;
        while let Some(c) = reader.next_char()? {
            while k > 0 && self.chars[k] != c {
                k = self.failure[k - 1];
            }
            if self.chars[k] == c {
                k += 1;
            }
            if k == m {
                matches.push(i + 1 - m);
                k = self.failure[m - 1];
            }
            i += 1;
        }
        Ok(matches)
    }
}

fn build_failure_table(pattern: &[char]) -> Vec<usize> {
    let m = pattern.len();
    let mut failure = vec![0usize; m];
    if m == 0 {
        return failure;
    }

    let mut k = 0usize;
    for i in 1..m {
        while k > 0 && pattern[k] != pattern[i] {
            k = failure[k - 1];
        }
        if pattern[k] == pattern[i] {
            k += 1;
        }
        failure[i] = k;
    }
    failure
}
