use serde::{Deserialize, Serialize};

/// A sequence index entry.
///
/// This struct represents the byte layout of a single record in a
/// sequence file. It contains the title of the record, the offsets
/// of its header line and of its first sequence byte, the number of
/// sequence characters it holds, and the width its lines are wrapped at.
///
/// Field order is the column order of the persisted index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub title: String,
    pub header_offset: u64,
    pub seq_offset: u64,
    pub seq_length: u64,
    /// Longest sequence line observed for the record. Every line but the
    /// last is assumed to be exactly this wide.
    pub line_width: u64,
}

impl IndexEntry {
    /// Start a new entry for a header line beginning at `header_offset`.
    pub fn new(title: String, header_offset: u64, seq_offset: u64) -> Self {
        Self {
            title,
            header_offset,
            seq_offset,
            seq_length: 0,
            line_width: 0,
        }
    }

    /// Account for one sequence line of `len` characters.
    pub fn add_line(&mut self, len: u64) {
        self.seq_length += len;
        self.line_width = self.line_width.max(len);
    }
}
