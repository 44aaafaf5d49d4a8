use crate::{
    reverse_complement::DNA, sampler, Error, FastaIndex, IndexConfig, IndexEntry, QueryPosition,
    Result, SampledRecord,
};
use memmap2::Mmap;
use rand::Rng;
use std::{
    fs::File,
    io::{Cursor, Read, Seek, SeekFrom},
    path::Path,
};

/// Validate the logical range of a query against its entry.
fn validate_interval(entry: &IndexEntry, from: u64, to: u64) -> Result<()> {
    let (start, end) = (from.min(to), from.max(to));
    if start == end {
        return Err(Error::EmptyRange(start));
    }
    if end > entry.seq_length {
        return Err(Error::RangeOutOfBounds {
            title: entry.title.clone(),
            start,
            end,
            length: entry.seq_length,
        });
    }
    Ok(())
}

/// Extract `[from, to)` of `entry` into `buffer`, replacing its contents.
///
/// A descending range (`from > to`) reads `[to, from)` and returns its
/// reverse complement.
pub fn extract_into<R: Read + Seek>(
    reader: &mut R,
    entry: &IndexEntry,
    from: u64,
    to: u64,
    buffer: &mut Vec<u8>,
) -> Result<()> {
    validate_interval(entry, from, to)?;
    let query_pos = QueryPosition::new(entry, from, to)?;

    reader.seek(SeekFrom::Start(query_pos.pos))?;
    buffer.clear();
    let got = reader
        .by_ref()
        .take(query_pos.buffer_size)
        .read_to_end(buffer)? as u64;
    if got < query_pos.buffer_size {
        return Err(Error::ReadShortfall {
            offset: query_pos.pos,
            expected: query_pos.buffer_size,
            got,
        });
    }

    buffer.retain(|&c| !matches!(c, b'\n' | b'\r' | 0));
    if buffer.len() as u64 != query_pos.length {
        return Err(Error::LengthMismatch {
            expected: query_pos.length,
            got: buffer.len() as u64,
        });
    }

    if query_pos.reverse {
        *buffer = DNA.reverse_complement(buffer)?;
    }
    Ok(())
}

/// Extract `[from, to)` of `entry` from a seekable handle.
///
/// The handle's position is moved; callers sharing one handle between
/// threads must serialize access to it.
///
/// # Errors
///
/// - [`Error::EmptyRange`] if `from == to`.
/// - [`Error::RangeOutOfBounds`] if the range ends past the record.
/// - [`Error::ZeroWrapWidth`] if the entry has a line width of zero.
/// - [`Error::ReadShortfall`] if the file ends inside the span.
/// - [`Error::LengthMismatch`] if the span does not hold exactly the
///   requested number of sequence characters.
/// - [`Error::UnsupportedSymbol`] for a descending range over bases
///   outside the nucleotide pairing.
pub fn extract_range<R: Read + Seek>(
    reader: &mut R,
    entry: &IndexEntry,
    from: u64,
    to: u64,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    extract_into(reader, entry, from, to, &mut buffer)?;
    Ok(buffer)
}

/// An indexed sequence file.
///
/// This struct is used to query a sequence file by title or position and
/// logical range. Every query seeks the underlying handle and reads only
/// the bytes covering the range, so the file is never loaded whole.
///
/// # Examples
///
/// ```
/// use faseek::{FastaIndex, IndexConfig, IndexedFasta};
///
/// let config = IndexConfig::default();
/// let index = FastaIndex::from_filepath("example_data/example.fa.idx", &config)
///     .expect("Could not read index file");
/// let mut faidx = IndexedFasta::from_filepath(index, "example_data/example.fa")
///     .expect("Could not read FASTA file");
///
/// // Query the first 10 bases of chr1
/// let seq = faidx.query("chr1", 0, 10).unwrap();
/// assert_eq!(seq, b"ACCTACGATC");
///
/// // A descending range gives the reverse complement
/// let seq = faidx.query("chr1", 10, 0).unwrap();
/// assert_eq!(seq, b"GATCGTAGGT");
/// ```
#[derive(Debug)]
pub struct IndexedFasta<R = File> {
    index: FastaIndex,
    reader: R,
    buffer: Vec<u8>,
}
impl IndexedFasta<File> {
    /// Create a new `IndexedFasta` from a `FastaIndex` and a file path.
    pub fn from_filepath<P: AsRef<Path>>(index: FastaIndex, path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::IoOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(index, file))
    }

    /// Load (or build) the index for `path` and open the file.
    pub fn open<P: AsRef<Path>>(path: P, config: &IndexConfig) -> Result<Self> {
        let index = FastaIndex::open(&path, config)?;
        Self::from_filepath(index, path)
    }
}
impl IndexedFasta<Cursor<Mmap>> {
    /// Create a new `IndexedFasta` over a read-only memory map of `path`.
    pub fn from_mmap<P: AsRef<Path>>(index: FastaIndex, path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::IoOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self::new(index, Cursor::new(mmap)))
    }
}
impl<R: Read + Seek> IndexedFasta<R> {
    pub fn new(index: FastaIndex, reader: R) -> Self {
        Self {
            index,
            reader,
            buffer: Vec::new(),
        }
    }

    pub fn index(&self) -> &FastaIndex {
        &self.index
    }

    /// Query the record titled `title` over the logical range `[from, to)`.
    ///
    /// Newlines are stripped from the result. The returned slice borrows
    /// an internal buffer reused by every query.
    pub fn query(&mut self, title: &str, from: u64, to: u64) -> Result<&[u8]> {
        let entry = match self.index.get(title) {
            Some(entry) => entry,
            None => return Err(Error::MissingRecord(title.to_string())),
        };
        extract_into(&mut self.reader, entry, from, to, &mut self.buffer)?;
        Ok(&self.buffer)
    }

    /// Query the record at `position` in file order.
    pub fn query_entry(&mut self, position: usize, from: u64, to: u64) -> Result<&[u8]> {
        let entry = match self.index.entry(position) {
            Some(entry) => entry,
            None => return Err(Error::MissingRecord(format!("#{position}"))),
        };
        extract_into(&mut self.reader, entry, from, to, &mut self.buffer)?;
        Ok(&self.buffer)
    }

    /// Draw a random subsequence of `length` bases.
    pub fn sample<G: Rng>(&mut self, rng: &mut G, length: u64) -> Result<SampledRecord> {
        sampler::sample_random(&mut self.reader, &self.index, rng, length)
    }
}
