//! # faseek
//!
//! `faseek` is a library for random-access extraction of subsequences from
//! large, line-wrapped FASTA/FASTQ-style files. It never loads the file into
//! memory: a single pass records the byte layout of every record into a
//! small text index, and every later query seeks straight to the bytes it
//! needs.
//!
//! ## Index format
//!
//! One line per record, five tab-separated fields:
//!
//! ```text
//! title	header_offset	seq_offset	seq_length	line_width
//! ```
//!
//! `line_width` is the longest sequence line of the record. Every line but
//! the last is assumed to be exactly that wide, as in any file wrapped at a
//! fixed width. The index is not checked against the source file; if the
//! file changes, rebuild the index.
//!
//! ## Example
//!
//! Here is an example fasta file:
//!
//! ### example.fa
//!
//! ```text
//! >chr1
//! ACCTACGATCGACTGATCGTAGCTAGCT
//! CATCGATCGTACGGACGATCGATCGGTT
//! CACACCGGGCATGACTGATCGGGGGCCC
//! ACGTGTGTGCAGCGCGCGGCGCGCGCGG
//! >chr2 second contig
//! TTTTGATCGATCGGCGGGCGCGCGCGGC
//! CAGATTCGGGCGCGATTATATATTAGCT
//! CGACGGCGACTCGAGCTACACGTCGGGC
//! GCGAGCGGGACGCGCGGCGCGCGCGGCC
//! AAAAAAATTTTTATATATTATTACGCGC
//! CGACTCAGTCGACTGGGGGCGCGCGCGC
//! AAACCACA
//! >chr3
//! ; annotation line
//!
//! NNNNACGTNN
//! GATTACA
//! ```
//!
//! and its corresponding index file:
//!
//! ### example.fa.idx
//!
//! ```text
//! chr1	0	6	112	28
//! chr2	122	142	176	28
//! chr3	325	350	17	10
//! ```
//!
//! ### Querying the file
//!
//! ```rust
//! use faseek::{FastaIndex, IndexConfig, IndexedFasta};
//!
//! let config = IndexConfig::default();
//! let index = FastaIndex::from_filepath("example_data/example.fa.idx", &config)
//!     .expect("Could not read index file");
//! let mut faidx = IndexedFasta::from_filepath(index, "example_data/example.fa")
//!     .expect("Could not read FASTA file");
//!
//! // Query the first 10 bases of chr2
//! let seq = faidx.query("chr2", 0, 10).unwrap();
//! assert_eq!(seq, b"TTTTGATCGA");
//!
//! // Query 40 bases of chr1, spanning a line break
//! let seq = faidx.query("chr1", 0, 40).unwrap();
//! assert_eq!(seq.len(), 40);
//! assert_eq!(seq.iter().filter(|&&b| b == b'\n').count(), 0);
//! ```
//!
//! ### Random sampling
//!
//! ```rust
//! use faseek::{IndexConfig, IndexedFasta};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("example.fa");
//! # std::fs::copy("example_data/example.fa", &path).unwrap();
//! // builds `example.fa.idx` next to the file on first use
//! let mut faidx = IndexedFasta::open(&path, &IndexConfig::default()).unwrap();
//! let mut rng = SmallRng::seed_from_u64(42);
//! let sample = faidx.sample(&mut rng, 12).unwrap();
//! assert_eq!(sample.sequence.len(), 12);
//! println!("{sample}");
//! ```

mod config;
mod error;
mod fasta_index;
mod index_builder;
mod index_entry;
mod indexed_fasta;
mod query_position;
mod reverse_complement;
mod sampler;

/// Layout constants of the persisted index.
pub use config::IndexConfig;

/// Error types of the crate.
pub use error::{Error, IndexParseError, Result};

/// The `FastaIndex` struct represents an ordered, persisted index.
pub use fasta_index::FastaIndex;

/// The `IndexBuilder` struct scans a sequence file into index entries.
pub use index_builder::IndexBuilder;

/// The `IndexEntry` struct represents the byte layout of one record.
pub use index_entry::IndexEntry;

/// The `IndexedFasta` struct represents a sequence file opened for queries.
pub use indexed_fasta::{extract_into, extract_range, IndexedFasta};

/// The `QueryPosition` struct translates logical ranges into byte spans.
pub use query_position::QueryPosition;

pub use reverse_complement::{reverse_complement, NucleotidePairing, DNA};

pub use sampler::{sample_random, SampledRecord, Strand};
