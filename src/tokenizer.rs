//! Streaming tokenizer: turns a character reader into word records.

use crate::reader::CharReader;

/// A single emitted word: its ingest-time hash, position, and length.
///
/// `source_name` is attached by the caller after tokenization (the
/// tokenizer itself is source-agnostic; it's handed a bare reader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub source_name: Box<str>,
    pub word_hash: u32,
    pub word_pos: usize,
    pub word_length: usize,
}

/// Any Unicode alphabetic or decimal-digit code point is a word character;
/// everything else (whitespace, punctuation, control, line terminators) is
/// a delimiter.
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c.is_numeric()
}

/// Java's `String.hashCode()` over a character sequence: `acc = acc * 31 +
/// c` per code point, wrapping on 32-bit two's complement overflow. Must be
/// reproduced bit-exactly between ingest and query time.
#[must_use]
pub fn java_hash(chars: impl IntoIterator<Item = char>) -> u32 {
    let mut acc: u32 = 0;
    for c in chars {
        acc = acc.wrapping_mul(31).wrapping_add(c as u32);
    }
    acc
}

/// Tokenizes `reader` into word records, calling `sink` once per word in
/// the order they're read.
///
/// Emits a record on every word-character → non-word-character transition,
/// plus one final record if the stream ends mid-word. An all-delimiter or
/// empty stream emits nothing.
///
/// # Errors
///
/// Propagates any I/O error from `reader`.
pub fn tokenize(
    source_name: &str,
    reader: &mut dyn CharReader,
    mut sink: impl FnMut(WordRecord),
) -> std::io::Result<()> {
    let mut current: Vec<char> = Vec::new();
    let mut word_start = 0usize;
    let mut pos = 0usize;
    let mut started = false;

    while let Some(c) = reader.next_char()? {
        if started {
            pos += 1;
        }
        started = true;

        if is_word_char(c) {
            if current.is_empty() {
                word_start = pos;
            }
            current.push(c);
        } else if !current.is_empty() {
            emit(source_name, &mut current, word_start, &mut sink);
        }
    }

    if !current.is_empty() {
        emit(source_name, &mut current, word_start, &mut sink);
    }

    Ok(())
}

fn emit(source_name: &str, current: &mut Vec<char>, word_start: usize, sink: &mut impl FnMut(WordRecord)) {
    let word_length = current.len();
    let word_hash = java_hash(current.iter().copied());
    sink(WordRecord {
        source_name: Box::from(source_name),
        word_hash,
        word_pos: word_start,
        word_length,
    });
    current.clear();
}
