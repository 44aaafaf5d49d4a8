use crate::{Error, FastaIndex, IndexConfig, IndexEntry, Result};
use log::{debug, info};
use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter},
    path::Path,
};

/// First characters that open a new record (`>` sequence, `@` read).
pub const HEADER_SENTINELS: &[u8] = b">@";

/// First characters of comment, quality-separator and blank-ish lines.
pub const SKIP_MARKERS: &[u8] = b";+ ";

enum LineKind {
    Header,
    Skip,
    Sequence,
}

fn classify(line: &[u8]) -> LineKind {
    match line.first() {
        None => LineKind::Skip,
        Some(c) if HEADER_SENTINELS.contains(c) => LineKind::Header,
        Some(c) if SKIP_MARKERS.contains(c) => LineKind::Skip,
        Some(_) => LineKind::Sequence,
    }
}

/// Header line minus its sentinel, cut at the first whitespace.
fn parse_title(header: &[u8]) -> String {
    let name = &header[1..];
    let end = name
        .iter()
        .position(|c| c.is_ascii_whitespace())
        .unwrap_or(name.len());
    String::from_utf8_lossy(&name[..end]).into_owned()
}

fn finalize(entries: &mut Vec<IndexEntry>, entry: IndexEntry) {
    if entry.seq_length == 0 {
        debug!(
            "Dropping empty record '{}' at offset {}",
            entry.title, entry.header_offset
        );
        return;
    }
    entries.push(entry);
}

/// Single forward pass over a sequence file.
///
/// Builds the ordered list of [`IndexEntry`] records and persists them
/// using the layout described by an [`IndexConfig`].
#[derive(Debug)]
pub struct IndexBuilder<'a> {
    config: &'a IndexConfig,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(config: &'a IndexConfig) -> Self {
        Self { config }
    }

    /// Scan a sequence stream line by line, tracking byte offsets.
    ///
    /// Lines are split on `\n` only. Content before the first header is
    /// ignored, and records without any sequence characters are dropped.
    pub fn scan<R: BufRead>(mut reader: R) -> Result<Vec<IndexEntry>> {
        let mut entries = Vec::new();
        let mut current: Option<IndexEntry> = None;
        let mut offset = 0;
        let mut line = Vec::new();

        while reader.read_until(b'\n', &mut line)? > 0 {
            let text = line.strip_suffix(b"\n").unwrap_or(line.as_slice());
            let next_offset = offset + text.len() as u64 + 1;
            match classify(text) {
                LineKind::Header => {
                    if let Some(done) = current.take() {
                        finalize(&mut entries, done);
                    }
                    current = Some(IndexEntry::new(parse_title(text), offset, next_offset));
                }
                LineKind::Skip => {
                    // comments and separators ahead of the data shift its start
                    if let Some(entry) = current.as_mut().filter(|e| e.seq_length == 0) {
                        entry.seq_offset = next_offset;
                    }
                }
                LineKind::Sequence => {
                    if let Some(entry) = current.as_mut() {
                        entry.add_line(text.len() as u64);
                    }
                }
            }
            offset = next_offset;
            line.clear();
        }
        if let Some(done) = current {
            finalize(&mut entries, done);
        }
        Ok(entries)
    }

    /// Index `source` and write the result to `index_path`.
    ///
    /// The index file is created exclusively: an existing file at
    /// `index_path` is an [`Error::IndexCreate`], never overwritten.
    /// A partially written index is removed if the scan fails.
    pub fn build<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        index_path: Q,
    ) -> Result<FastaIndex> {
        let (source, index_path) = (source.as_ref(), index_path.as_ref());
        let fasta = File::open(source).map_err(|e| Error::IoOpen {
            path: source.to_path_buf(),
            source: e,
        })?;
        let out = File::options()
            .write(true)
            .create_new(true)
            .open(index_path)
            .map_err(|e| Error::IndexCreate {
                path: index_path.to_path_buf(),
                source: e,
            })?;

        let result = Self::scan(BufReader::new(fasta))
            .map(FastaIndex::from_entries)
            .and_then(|index| {
                index.write_to(BufWriter::new(out), self.config)?;
                Ok(index)
            });
        match result {
            Ok(index) => {
                info!(
                    "Indexed {} records from {} into {}",
                    index.len(),
                    source.display(),
                    index_path.display()
                );
                Ok(index)
            }
            Err(err) => {
                let _ = fs::remove_file(index_path);
                Err(err)
            }
        }
    }
}
