use crate::{Error, IndexEntry, Result};

/// A query position.
///
/// Translates a logical range within an entry's unwrapped sequence into
/// the physical byte span of the source file that covers it, including
/// every line terminator interleaved within the range.
///
/// Every line before the one holding `start` is assumed to be exactly
/// `line_width` characters long. If the file was wrapped at a different
/// width than the index records, the span is wrong; the extractor
/// surfaces that as a length mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPosition {
    /// Logical start (the lower end of the range)
    pub start: u64,
    /// Number of logical sequence characters requested
    pub length: u64,
    /// Byte offset of `start` within the source file
    pub pos: u64,
    /// Number of bytes to read from `pos`
    pub buffer_size: u64,
    /// Whether the range was given in descending order
    pub reverse: bool,
}
impl QueryPosition {
    /// Compute the physical span of `[min(from, to), max(from, to))`.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroWrapWidth`] if the entry has a line width of zero.
    pub fn new(entry: &IndexEntry, from: u64, to: u64) -> Result<Self> {
        let width = entry.line_width;
        if width == 0 {
            return Err(Error::ZeroWrapWidth {
                title: entry.title.clone(),
            });
        }
        let (start, end, reverse) = if from <= to {
            (from, to, false)
        } else {
            (to, from, true)
        };
        let length = end - start;
        // wrap boundaries falling strictly inside the range
        let num_lines = match length {
            0 => 0,
            _ => (start + length - 1) / width - start / width,
        };
        Ok(Self {
            start,
            length,
            pos: entry.seq_offset + start + start / width,
            buffer_size: length + num_lines,
            reverse,
        })
    }
}
