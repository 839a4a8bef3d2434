//! Duck-typed character reader capability.
//!
//! The tokenizer, the KMP scanner, and slice reads all operate over a
//! `CharReader`: something that can hand back one Unicode code point at a
//! time. This lets the same algorithms run unchanged over an in-memory
//! string (`StrCharReader`) or a buffered byte stream decoded as UTF-8
//! (`ByteCharReader`), mirroring the `Reader`/`Buffered` split the teacher
//! uses for sequential vs. mapped input.

use std::io::{self, Read};
use std::sync::Arc;

/// A source of Unicode code points, read one at a time.
pub trait CharReader {
    /// Returns the next code point, or `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the underlying byte stream fails to read
    /// or does not decode as valid UTF-8.
    fn next_char(&mut self) -> io::Result<Option<char>>;

    /// Skips the next `n` code points, stopping early at end of stream.
    fn skip(&mut self, n: usize) -> io::Result<()> {
        for _ in 0..n {
            if self.next_char()?.is_none() {
                break;
            }
        }
        Ok(())
    }
}

/// Reads code points from an already-decoded in-memory string.
#[derive(Debug, Clone)]
pub struct StrCharReader {
    data: Arc<str>,
    byte_pos: usize,
}

impl StrCharReader {
    /// Creates a reader over the full contents of `data`.
    #[must_use]
    pub fn new(data: Arc<str>) -> Self {
        Self { data, byte_pos: 0 }
    }
}

impl CharReader for StrCharReader {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        if self.byte_pos >= self.data.len() {
            return Ok(None);
        }
        let Some(c) = self.data[self.byte_pos..].chars().next() else {
            return Ok(None);
        };
        self.byte_pos += c.len_utf8();
        Ok(Some(c))
    }
}

/// Reads code points from a byte stream, decoding UTF-8 on the fly.
///
/// Reads are delegated one leading byte at a time to an inner `Read`
/// (expected to already be buffered, e.g. a `BufReader`), so continuation
/// bytes for a multi-byte sequence are fetched only when a leading byte
/// says they're needed. No sequence is ever split across two calls: the
/// reader either returns a complete code point or an error.
pub struct ByteCharReader<R: Read> {
    inner: R,
}

impl<R: Read> ByteCharReader<R> {
    /// Wraps `inner` as a code-point source.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> CharReader for ByteCharReader<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let mut lead = [0u8; 1];
        match read_fully(&mut self.inner, &mut lead)? {
            0 => Ok(None),
            _ => {
                let width = utf8_char_width(lead[0]);
                if width == 1 {
                    return Ok(Some(char::from(lead[0])));
                }

                let mut buf = [0u8; 4];
                buf[0] = lead[0];
                let got = read_fully(&mut self.inner, &mut buf[1..width])?;
                if got != width - 1 {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "truncated UTF-8 sequence",
                    ));
                }

                let s = std::str::from_utf8(&buf[..width])
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(s.chars().next())
            }
        }
    }
}

/// Reads into `buf` until it is full or the stream is exhausted, returning
/// the number of bytes actually read (short only at end of stream).
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}

/// Number of bytes in the UTF-8 sequence starting with `lead`.
///
/// Invalid leading bytes are treated as width 1; the subsequent
/// `str::from_utf8` validation in `ByteCharReader::next_char` is what
/// actually surfaces malformed input as an error.
const fn utf8_char_width(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}
