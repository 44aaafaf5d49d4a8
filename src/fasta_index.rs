use crate::{error::IndexParseError, Error, IndexBuilder, IndexConfig, IndexEntry, Result};
use hashbrown::HashMap;
use log::{debug, warn};
use std::{
    fs::{self, File},
    io::{self, BufReader, Read, Write},
    path::Path,
};

/// Number of columns in a persisted index line.
const NUM_FIELDS: usize = 5;

/// A sequence file index.
///
/// Entries are kept in file order and can be looked up by position or
/// by title. When titles repeat, lookup by title returns the first one.
#[derive(Debug, Default, Clone)]
pub struct FastaIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
}
impl FastaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    pub fn insert(&mut self, entry: IndexEntry) {
        self.positions
            .entry(entry.title.clone())
            .or_insert(self.entries.len());
        self.entries.push(entry);
    }

    /// Parse a persisted index.
    ///
    /// Every line must carry exactly five fields with numeric offsets,
    /// length and width. The first bad line fails the whole load, so a
    /// partial index is never returned.
    pub fn from_reader<R: Read>(reader: R, config: &IndexConfig) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);
        let mut index = Self::new();
        for record in csv_reader.records() {
            let record = record.map_err(IndexParseError::from)?;
            if record.len() != NUM_FIELDS {
                return Err(IndexParseError::FieldCount {
                    line: record.position().map_or(0, |p| p.line()),
                    found: record.len(),
                }
                .into());
            }
            let entry: IndexEntry = record.deserialize(None).map_err(IndexParseError::from)?;
            index.insert(entry);
        }
        Ok(index)
    }

    pub fn from_filepath<P: AsRef<Path>>(path: P, config: &IndexConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::IoOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// Write one line per entry in file order.
    ///
    /// Titles are written as-is; a title containing the delimiter will
    /// not survive a reload.
    pub fn write_to<W: Write>(&self, writer: W, config: &IndexConfig) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        for entry in &self.entries {
            csv_writer
                .serialize(entry)
                .map_err(|e| Error::Io(io::Error::from(e)))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Load the index at `index_path`, or build it from `source` when it
    /// cannot be opened.
    ///
    /// No staleness check is made: an index left behind by an older
    /// version of `source` is trusted as-is.
    pub fn load_or_build<P: AsRef<Path>, Q: AsRef<Path>>(
        source: P,
        index_path: Q,
        config: &IndexConfig,
    ) -> Result<Self> {
        let index_path = index_path.as_ref();
        match File::open(index_path) {
            Ok(file) => {
                let index = Self::from_reader(BufReader::new(file), config)?;
                debug!(
                    "Loaded {} records from {}",
                    index.len(),
                    index_path.display()
                );
                Ok(index)
            }
            Err(err) => {
                warn!(
                    "Index {} unavailable ({}), building from {}",
                    index_path.display(),
                    err,
                    source.as_ref().display()
                );
                IndexBuilder::new(config).build(source, index_path)
            }
        }
    }

    /// [`FastaIndex::load_or_build`] at the path derived from `config`.
    pub fn open<P: AsRef<Path>>(source: P, config: &IndexConfig) -> Result<Self> {
        let index_path = config.index_path(&source);
        Self::load_or_build(source, index_path, config)
    }

    /// Discard any existing index at `index_path` and build a fresh one.
    pub fn rebuild<P: AsRef<Path>, Q: AsRef<Path>>(
        source: P,
        index_path: Q,
        config: &IndexConfig,
    ) -> Result<Self> {
        let index_path = index_path.as_ref();
        match fs::remove_file(index_path) {
            Ok(()) => debug!("Removed previous index {}", index_path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(Error::IndexCreate {
                    path: index_path.to_path_buf(),
                    source: err,
                })
            }
        }
        IndexBuilder::new(config).build(source, index_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Entry at `position` in file order.
    pub fn entry(&self, position: usize) -> Option<&IndexEntry> {
        self.entries.get(position)
    }

    pub fn get(&self, title: &str) -> Option<&IndexEntry> {
        self.positions.get(title).map(|&i| &self.entries[i])
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use anyhow::Result;

    const SOURCE: &str = ">seq1\nACGTACGTAC\nGTACGT\n>seq2 desc\nGGCC\n";

    fn parse(text: &str) -> crate::Result<FastaIndex> {
        FastaIndex::from_reader(text.as_bytes(), &IndexConfig::default())
    }

    #[test]
    fn parse_five_fields() -> Result<()> {
        let index = parse("seq1\t0\t6\t16\t10\nseq2\t24\t35\t4\t4\n")?;
        assert_eq!(index.len(), 2);
        let entry = index.get("seq2").unwrap();
        assert_eq!(entry.header_offset, 24);
        assert_eq!(entry.seq_offset, 35);
        assert_eq!(entry.seq_length, 4);
        assert_eq!(entry.line_width, 4);
        assert_eq!(index.entry(0).unwrap().title, "seq1");
        Ok(())
    }

    #[test]
    fn missing_field_rejected() {
        let result = parse("seq1\t0\t6\t16\n");
        assert!(matches!(
            result,
            Err(Error::IndexParse(IndexParseError::FieldCount { line: 1, found: 4 }))
        ));
    }

    #[test]
    fn short_line_after_valid_line_rejected() {
        let result = parse("seq1\t0\t6\t16\t10\nseq2\t23\t34\t4\n");
        assert!(matches!(
            result,
            Err(Error::IndexParse(IndexParseError::FieldCount { line: 2, found: 4 }))
        ));
    }

    #[test]
    fn extra_field_rejected() {
        let result = parse("seq1\t0\t6\t16\t10\t99\n");
        assert!(matches!(
            result,
            Err(Error::IndexParse(IndexParseError::FieldCount { found: 6, .. }))
        ));
    }

    #[test]
    fn non_numeric_field_rejected() {
        let result = parse("seq1\t0\tsix\t16\t10\n");
        assert!(matches!(
            result,
            Err(Error::IndexParse(IndexParseError::Csv(_)))
        ));
        let result = parse("seq1\t0\t6\t-16\t10\n");
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_titles_keep_first() {
        let mut index = FastaIndex::new();
        index.insert(IndexEntry::new("dup".to_string(), 0, 5));
        index.insert(IndexEntry::new("dup".to_string(), 40, 45));
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("dup").unwrap().header_offset, 0);
        assert!(index.get("other").is_none());
    }

    #[test]
    fn write_then_read() -> Result<()> {
        let config = IndexConfig::default();
        let index = FastaIndex::from_entries(IndexBuilder::scan(SOURCE.as_bytes())?);
        let mut buffer = Vec::new();
        index.write_to(&mut buffer, &config)?;
        assert_eq!(
            String::from_utf8(buffer.clone())?,
            "seq1\t0\t6\t16\t10\nseq2\t24\t35\t4\t4\n"
        );
        let reloaded = FastaIndex::from_reader(buffer.as_slice(), &config)?;
        assert_eq!(reloaded.entries(), index.entries());
        Ok(())
    }

    #[test]
    fn custom_delimiter() -> Result<()> {
        let config = IndexConfig::default().with_delimiter(b',');
        let index = FastaIndex::from_entries(IndexBuilder::scan(SOURCE.as_bytes())?);
        let mut buffer = Vec::new();
        index.write_to(&mut buffer, &config)?;
        assert!(String::from_utf8(buffer.clone())?.starts_with("seq1,0,6,16,10\n"));
        let reloaded = FastaIndex::from_reader(buffer.as_slice(), &config)?;
        assert_eq!(reloaded.entries(), index.entries());
        Ok(())
    }

    #[test]
    fn load_or_build_falls_back_to_build() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("x.fa");
        fs::write(&source, SOURCE)?;
        let config = IndexConfig::default();
        let index_path = config.index_path(&source);
        assert!(!index_path.exists());

        let built = FastaIndex::open(&source, &config)?;
        assert!(index_path.exists());
        let loaded = FastaIndex::open(&source, &config)?;
        assert_eq!(built.entries(), loaded.entries());
        Ok(())
    }

    #[test]
    fn explicit_index_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("x.fa");
        let index_path = dir.path().join("elsewhere.index");
        fs::write(&source, SOURCE)?;
        let config = IndexConfig::default();
        let index = FastaIndex::load_or_build(&source, &index_path, &config)?;
        assert_eq!(index.len(), 2);
        assert!(index_path.exists());
        assert!(!config.index_path(&source).exists());
        Ok(())
    }

    #[test]
    fn index_idempotence() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("x.fa");
        fs::write(&source, SOURCE)?;
        let config = IndexConfig::default();
        let first = dir.path().join("first.idx");
        let second = dir.path().join("second.idx");
        FastaIndex::load_or_build(&source, &first, &config)?;
        FastaIndex::load_or_build(&source, &second, &config)?;
        assert_eq!(fs::read(&first)?, fs::read(&second)?);
        Ok(())
    }

    #[test]
    fn corrupt_index_fails_then_rebuilds() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("x.fa");
        let index_path = dir.path().join("x.fa.idx");
        fs::write(&source, SOURCE)?;
        fs::write(&index_path, "seq1\t0\t6\t16\n")?;
        let config = IndexConfig::default();

        let loaded = FastaIndex::load_or_build(&source, &index_path, &config);
        assert!(matches!(loaded, Err(Error::IndexParse(_))));

        let rebuilt = FastaIndex::rebuild(&source, &index_path, &config)?;
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(
            fs::read_to_string(&index_path)?,
            "seq1\t0\t6\t16\t10\nseq2\t24\t35\t4\t4\n"
        );
        Ok(())
    }
}
