//! Query planner: mode selection between full KMP scan and hash-index-
//! assisted hybrid search.

use std::collections::BTreeSet;
use std::sync::Arc;

use hashbrown::HashMap as FastMap;
use rayon::prelude::*;

use crate::cache::SearchResult;
use crate::error::SearchError;
use crate::kmp::Pattern;
use crate::reader::StrCharReader;
use crate::source::Source;
use crate::tokenizer::{tokenize, WordRecord};
use crate::word_index::WordIndex;

/// Runs `query` against every registered source, choosing non-indexed or
/// hybrid mode per spec.
///
/// # Errors
///
/// Returns [`SearchError::Io`] if reading a streamed source fails during
/// scanning or verification.
pub fn search(
    registry: &FastMap<String, Arc<Source>>,
    index: &WordIndex,
    query: &str,
) -> Result<SearchResult, SearchError> {
    let qchars: Vec<char> = query.chars().collect();
    if qchars.len() < 3 {
        return Ok(SearchResult::new());
    }

    let mut q_reader = StrCharReader::new(Arc::from(query));
    let mut q_words = Vec::new();
    tokenize("search", &mut q_reader, |w| q_words.push(w))
        .expect("in-memory reader never fails");

    let pattern = Pattern::new(query);

    if q_words.len() < 3 {
        return scan_all(registry.values(), &pattern);
    }

    hybrid_search(registry, index, &q_words, &qchars, &pattern)
}

fn hybrid_search(
    registry: &FastMap<String, Arc<Source>>,
    index: &WordIndex,
    q_words: &[WordRecord],
    qchars: &[char],
    pattern: &Pattern,
) -> Result<SearchResult, SearchError> {
    let non_indexable = registry.values().filter(|s| !s.is_indexable());
    let mut result = scan_all(non_indexable, pattern)?;

    let interior = &q_words[1..q_words.len() - 1];
    let mut pivot: Option<&WordRecord> = None;
    let mut pivot_bucket_len = usize::MAX;
    let mut any_empty = false;

    for word in interior {
        if word.word_length == 0 {
            continue;
        }
        let bucket = index.lookup(word.word_hash);
        if bucket.is_empty() {
            any_empty = true;
            break;
        }
        if bucket.len() < pivot_bucket_len {
            pivot_bucket_len = bucket.len();
            pivot = Some(word);
        }
    }

    if any_empty {
        return Ok(result);
    }

    let Some(pivot) = pivot else {
        return Ok(result);
    };

    let bucket = index.lookup(pivot.word_hash);
    let mut by_source: FastMap<&str, Vec<&WordRecord>> = FastMap::new();
    for record in bucket {
        by_source.entry(record.source_name.as_ref()).or_default().push(record);
    }

    for (source_name, mut candidates) in by_source {
        candidates.sort_by_key(|r| r.word_pos);
        let Some(source) = registry.get(source_name) else {
            continue;
        };
        let matches = verify_candidates(source, pivot, qchars, &candidates)?;
        if !matches.is_empty() {
            result.entry(source_name.to_string()).or_default().extend(matches);
        }
    }

    Ok(result)
}

fn scan_all<'a>(
    sources: impl Iterator<Item = &'a Arc<Source>>,
    pattern: &Pattern,
) -> Result<SearchResult, SearchError> {
    let sources: Vec<&Arc<Source>> = sources.collect();
    let scanned: Vec<(String, BTreeSet<usize>)> = sources
        .par_iter()
        .map(|source| scan_one(source, pattern))
        .collect::<Result<_, _>>()?;

    let mut result = SearchResult::new();
    for (name, matches) in scanned {
        if !matches.is_empty() {
            result.entry(name).or_default().extend(matches);
        }
    }
    Ok(result)
}

fn scan_one(source: &Source, pattern: &Pattern) -> Result<(String, BTreeSet<usize>), SearchError> {
    let matches = if source.is_loadable() {
        let content = source.read_full_string()?;
        let chars: Vec<char> = content.chars().collect();
        pattern.search_str(&chars)
    } else {
        let mut reader = source.open_reader()?;
        pattern.search_reader(&mut reader)?
    };
    Ok((source.name().to_string(), matches.into_iter().collect()))
}

/// Verifies each candidate start (`w.word_pos - pivot.word_pos`) by
/// character comparison, returning confirmed starts.
///
/// For a loadable source this slices the cached string directly. For a
/// streamed source this walks the reader forward once, re-seeking only
/// for the rare candidate whose start falls behind the current read
/// position (pivot records for a source are not guaranteed collision-free,
/// so this can happen with adversarial hash collisions).
fn verify_candidates(
    source: &Source,
    pivot: &WordRecord,
    qchars: &[char],
    candidates: &[&WordRecord],
) -> Result<Vec<usize>, SearchError> {
    let mut confirmed = Vec::new();
    let qlen = qchars.len();
    let char_len = source.char_len();

    if source.is_loadable() {
        let content = source.read_full_string()?;
        let text: Vec<char> = content.chars().collect();
        for candidate in candidates {
            let Some(start) = candidate_start(candidate, pivot) else {
                continue;
            };
            if start + qlen > char_len {
                continue;
            }
            if text[start..start + qlen] == *qchars {
                confirmed.push(start);
            }
        }
        return Ok(confirmed);
    }

    let mut reader = source.open_reader()?;
    let mut pos = 0usize;
    for candidate in candidates {
        let Some(start) = candidate_start(candidate, pivot) else {
            continue;
        };
        if start + qlen > char_len {
            continue;
        }

        if start < pos {
            let slice = source.read_slice(start, qlen)?;
            if slice.chars().eq(qchars.iter().copied()) {
                confirmed.push(start);
            }
            continue;
        }

        while pos < start {
            if reader.next_char()?.is_none() {
                break;
            }
            pos += 1;
        }

        let mut window = Vec::with_capacity(qlen);
        let mut exhausted = false;
        for _ in 0..qlen {
            match reader.next_char()? {
                Some(c) => {
                    window.push(c);
                    pos += 1;
                }
                None => {
                    exhausted = true;
                    break;
                }
            }
        }
        if !exhausted && window == *qchars {
            confirmed.push(start);
        }
    }

    Ok(confirmed)
}

fn candidate_start(candidate: &WordRecord, pivot: &WordRecord) -> Option<usize> {
    let start = candidate.word_pos as isize - pivot.word_pos as isize;
    (start >= 0).then_some(start as usize)
}
