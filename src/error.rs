use std::path::PathBuf;

/// Result type for faseek operations, wrapping the crate [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the faseek library.
///
/// Every variant reflects either a missing resource or a structural
/// mismatch between an index and the file it describes. None of them are
/// transient, so nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The source sequence file or an existing index could not be opened
    #[error("could not open file {}: {source}", path.display())]
    IoOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index file could not be created (it may already exist)
    #[error("could not create index file {}: {source}", path.display())]
    IndexCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted index could not be parsed
    #[error(transparent)]
    IndexParse(#[from] IndexParseError),

    /// The entry has a wrap width of zero, so no offset can be computed
    #[error("record '{title}' has a line width of zero")]
    ZeroWrapWidth { title: String },

    /// The requested range is empty (`from == to`)
    #[error("empty range requested at position {0}")]
    EmptyRange(u64),

    /// The requested range extends past the end of the record
    #[error("range {start}..{end} exceeds length {length} of record '{title}'")]
    RangeOutOfBounds {
        title: String,
        start: u64,
        end: u64,
        length: u64,
    },

    /// Fewer bytes were available than the physical span requires
    ///
    /// # Fields
    /// * `offset` - The byte position the read started at
    /// * `expected` - The physical span length
    /// * `got` - The number of bytes actually read
    #[error("expected {expected} bytes at offset {offset} but only {got} were available - possibly truncated")]
    ReadShortfall { offset: u64, expected: u64, got: u64 },

    /// The span, once stripped of line terminators, had the wrong length
    #[error("extracted {got} sequence characters, expected {expected} - index and file disagree")]
    LengthMismatch { expected: u64, got: u64 },

    /// A character outside the nucleotide pairing was found
    #[error("unsupported symbol {0:?} in sequence")]
    UnsupportedSymbol(char),

    /// Random sampling over an index with no entries
    #[error("index has no entries to sample from")]
    EmptyIndex,

    /// Random sampling of a length longer than the chosen record
    #[error("record '{title}' has length {length}, shorter than the requested {requested}")]
    RecordTooShort {
        title: String,
        length: u64,
        requested: u64,
    },

    /// No record with the requested title is present in the index
    #[error("no record named '{0}' in index")]
    MissingRecord(String),

    /// Standard I/O errors from the Rust standard library
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors specific to reading a persisted index
#[derive(thiserror::Error, Debug)]
pub enum IndexParseError {
    /// A line does not carry exactly five fields
    ///
    /// # Fields
    /// * `line` - The 1-based line number in the index file
    /// * `found` - The number of fields on that line
    #[error("index line {line} has {found} fields, expected 5")]
    FieldCount { line: u64, found: usize },

    /// A field could not be decoded (e.g. a non-numeric offset)
    #[error("malformed index record: {0}")]
    Csv(#[from] csv::Error),
}
