use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Default suffix appended to a source path to locate its index.
pub const DEFAULT_INDEX_SUFFIX: &str = ".idx";

/// Default field separator of the persisted index.
pub const DEFAULT_DELIMITER: u8 = b'\t';

/// Layout of a persisted index.
///
/// Both the builder and the loader take a reference to the same config,
/// so a file written with one set of constants is read back with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Suffix appended to the full source path (`x.fa` -> `x.fa.idx`)
    pub suffix: String,
    /// Single-byte field separator
    pub delimiter: u8,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_INDEX_SUFFIX.to_string(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl IndexConfig {
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Conventional index location for a source file.
    pub fn index_path<P: AsRef<Path>>(&self, source: P) -> PathBuf {
        let mut path = OsString::from(source.as_ref().as_os_str());
        path.push(&self.suffix);
        PathBuf::from(path)
    }
}
