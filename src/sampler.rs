use crate::{indexed_fasta::extract_range, Error, FastaIndex, Result};
use rand::Rng;
use std::{
    fmt,
    io::{Read, Seek},
};

/// Strand a sampled subsequence was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

/// A randomly located subsequence.
///
/// Formats as a two-line record: `>title start-end` for the plus strand,
/// `>title complement end-start` for the minus strand, followed by the
/// sequence. Display coordinates are 1-based with an exclusive end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledRecord {
    pub title: String,
    /// 0-based logical start on the plus strand
    pub start: u64,
    pub length: u64,
    pub strand: Strand,
    pub sequence: Vec<u8>,
}
impl SampledRecord {
    /// 1-based display start
    pub fn display_start(&self) -> u64 {
        self.start + 1
    }

    /// 1-based exclusive display end
    pub fn display_end(&self) -> u64 {
        self.start + self.length + 1
    }
}
impl fmt::Display for SampledRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strand {
            Strand::Plus => writeln!(
                f,
                ">{} {}-{}",
                self.title,
                self.display_start(),
                self.display_end()
            )?,
            Strand::Minus => writeln!(
                f,
                ">{} complement {}-{}",
                self.title,
                self.display_end(),
                self.display_start()
            )?,
        }
        write!(f, "{}", String::from_utf8_lossy(&self.sequence))
    }
}

/// Draw a subsequence of `length` bases at a uniformly random record,
/// start position and strand.
///
/// # Errors
///
/// - [`Error::EmptyIndex`] if the index has no entries.
/// - [`Error::RecordTooShort`] if the chosen record is shorter than `length`.
/// - [`Error::EmptyRange`] if `length` is zero.
/// - Any error of [`extract_range`].
pub fn sample_random<R, G>(
    reader: &mut R,
    index: &FastaIndex,
    rng: &mut G,
    length: u64,
) -> Result<SampledRecord>
where
    R: Read + Seek,
    G: Rng,
{
    if index.is_empty() {
        return Err(Error::EmptyIndex);
    }
    let entry = &index.entries()[rng.random_range(0..index.len())];
    if entry.seq_length < length {
        return Err(Error::RecordTooShort {
            title: entry.title.clone(),
            length: entry.seq_length,
            requested: length,
        });
    }
    let start = rng.random_range(0..=entry.seq_length - length);
    let strand = if rng.random_bool(0.5) {
        Strand::Minus
    } else {
        Strand::Plus
    };
    let sequence = match strand {
        Strand::Plus => extract_range(reader, entry, start, start + length)?,
        Strand::Minus => extract_range(reader, entry, start + length, start)?,
    };
    Ok(SampledRecord {
        title: entry.title.clone(),
        start,
        length,
        strand,
        sequence,
    })
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::{reverse_complement, IndexBuilder, IndexEntry};
    use anyhow::Result;
    use rand::{rngs::SmallRng, SeedableRng};
    use std::io::Cursor;

    const DATA: &[u8] = b">one\nACGTACGTAC\nGTACGT\n>two\nGGGAAATTTC\nCCAN\n";

    fn index() -> Result<FastaIndex> {
        Ok(FastaIndex::from_entries(IndexBuilder::scan(DATA)?))
    }

    fn short_entry() -> IndexEntry {
        IndexEntry {
            title: "short".to_string(),
            header_offset: 0,
            seq_offset: 7,
            seq_length: 5,
            line_width: 5,
        }
    }

    #[test]
    fn empty_index() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut reader = Cursor::new(DATA);
        let result = sample_random(&mut reader, &FastaIndex::new(), &mut rng, 4);
        assert!(matches!(result, Err(Error::EmptyIndex)));
    }

    #[test]
    fn record_too_short() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut reader = Cursor::new(b">short\nACGTA\n".as_slice());
        let index = FastaIndex::from_entries(vec![short_entry()]);
        let result = sample_random(&mut reader, &index, &mut rng, 10);
        assert!(matches!(
            result,
            Err(Error::RecordTooShort {
                length: 5,
                requested: 10,
                ..
            })
        ));
    }

    #[test]
    fn samples_match_extraction() -> Result<()> {
        let index = index()?;
        let mut rng = SmallRng::seed_from_u64(7);
        let mut reader = Cursor::new(DATA);
        let mut strands = (0, 0);
        for _ in 0..200 {
            let sample = sample_random(&mut reader, &index, &mut rng, 5)?;
            assert_eq!(sample.sequence.len(), 5);
            let entry = index.get(&sample.title).unwrap();
            assert!(sample.start + sample.length <= entry.seq_length);
            let forward = extract_range(&mut reader, entry, sample.start, sample.start + 5)?;
            match sample.strand {
                Strand::Plus => {
                    assert_eq!(sample.sequence, forward);
                    strands.0 += 1;
                }
                Strand::Minus => {
                    assert_eq!(sample.sequence, reverse_complement(&forward)?);
                    strands.1 += 1;
                }
            }
        }
        assert!(strands.0 > 0 && strands.1 > 0);
        Ok(())
    }

    #[test]
    fn seeded_sampling_is_deterministic() -> Result<()> {
        let index = index()?;
        let mut reader = Cursor::new(DATA);
        let draw = |reader: &mut Cursor<&[u8]>| -> Result<Vec<SampledRecord>> {
            let mut rng = SmallRng::seed_from_u64(1234);
            (0..10)
                .map(|_| sample_random(reader, &index, &mut rng, 3).map_err(anyhow::Error::from))
                .collect()
        };
        assert_eq!(draw(&mut reader)?, draw(&mut reader)?);
        Ok(())
    }

    #[test]
    fn whole_record_sample() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut reader = Cursor::new(b">short\nACGTA\n".as_slice());
        let index = FastaIndex::from_entries(vec![short_entry()]);
        let sample = sample_random(&mut reader, &index, &mut rng, 5)?;
        assert_eq!(sample.start, 0);
        let expected = match sample.strand {
            Strand::Plus => ">short 1-6\nACGTA",
            Strand::Minus => ">short complement 6-1\nTACGT",
        };
        assert_eq!(sample.to_string(), expected);
        Ok(())
    }

    #[test]
    fn display_format() {
        let mut record = SampledRecord {
            title: "chr2".to_string(),
            start: 9,
            length: 4,
            strand: Strand::Plus,
            sequence: b"ACGT".to_vec(),
        };
        assert_eq!(record.to_string(), ">chr2 10-14\nACGT");
        record.strand = Strand::Minus;
        assert_eq!(record.to_string(), ">chr2 complement 14-10\nACGT");
    }
}
