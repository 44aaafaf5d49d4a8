use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use faseek::{FastaIndex, IndexConfig, IndexedFasta};
use log::info;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{
    io::{self, BufWriter, Read, Seek, Write},
    path::{Path, PathBuf},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Random-access subsequence extraction from indexed FASTA/FASTQ files")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (-v info, -vv debug)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the index of a sequence file
    Index {
        /// Input sequence file
        fasta: PathBuf,

        /// Index path (defaults to <FASTA>.idx)
        #[clap(short, long)]
        index: Option<PathBuf>,

        /// Replace an existing index
        #[clap(short, long, action)]
        force: bool,
    },
    /// Extract [FROM, TO) of a record; FROM > TO gives the reverse complement
    Fetch {
        /// Input sequence file
        fasta: PathBuf,

        /// Record title
        title: String,

        /// Logical start (0-based)
        from: u64,

        /// Logical end (exclusive)
        to: u64,

        /// Index path (defaults to <FASTA>.idx)
        #[clap(short, long)]
        index: Option<PathBuf>,
    },
    /// Draw random subsequences on a random strand
    Sample {
        /// Input sequence file
        fasta: PathBuf,

        /// Length of each subsequence
        #[clap(short, long, default_value_t = 99)]
        length: u64,

        /// Number of subsequences
        #[clap(short = 'n', long, default_value_t = 4)]
        count: usize,

        /// Seed for reproducible draws
        #[clap(short, long)]
        seed: Option<u64>,

        /// Index path (defaults to <FASTA>.idx)
        #[clap(short, long)]
        index: Option<PathBuf>,

        /// Read through a memory map instead of seeking a file handle
        #[clap(long, action)]
        mmap: bool,
    },
}

fn index_path(config: &IndexConfig, fasta: &Path, index: Option<PathBuf>) -> PathBuf {
    index.unwrap_or_else(|| config.index_path(fasta))
}

fn load_index(config: &IndexConfig, fasta: &Path, index: Option<PathBuf>) -> Result<FastaIndex> {
    let index_path = index_path(config, fasta, index);
    FastaIndex::load_or_build(fasta, &index_path, config)
        .with_context(|| format!("Failed to load index {}", index_path.display()))
}

fn write_samples<R: Read + Seek, G: Rng, W: Write>(
    faidx: &mut IndexedFasta<R>,
    rng: &mut G,
    length: u64,
    count: usize,
    out: &mut W,
) -> Result<()> {
    for _ in 0..count {
        let sample = faidx.sample(rng, length)?;
        writeln!(out, "{sample}")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    let config = IndexConfig::default();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match args.command {
        Command::Index {
            fasta,
            index,
            force,
        } => {
            let index_path = index_path(&config, &fasta, index);
            let index = if force {
                FastaIndex::rebuild(&fasta, &index_path, &config)
            } else {
                FastaIndex::load_or_build(&fasta, &index_path, &config)
            }
            .with_context(|| format!("Failed to index {}", fasta.display()))?;
            info!("{} holds {} records", index_path.display(), index.len());
            writeln!(out, "{}\t{}", index_path.display(), index.len())?;
        }
        Command::Fetch {
            fasta,
            title,
            from,
            to,
            index,
        } => {
            let index = load_index(&config, &fasta, index)?;
            let mut faidx = IndexedFasta::from_filepath(index, &fasta)?;
            let seq = faidx
                .query(&title, from, to)
                .with_context(|| format!("Failed to extract {title}:{from}-{to}"))?;
            writeln!(out, ">{title} {from}-{to}")?;
            out.write_all(seq)?;
            writeln!(out)?;
        }
        Command::Sample {
            fasta,
            length,
            count,
            seed,
            index,
            mmap,
        } => {
            let index = load_index(&config, &fasta, index)?;
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };
            if mmap {
                let mut faidx = IndexedFasta::from_mmap(index, &fasta)?;
                write_samples(&mut faidx, &mut rng, length, count, &mut out)?;
            } else {
                let mut faidx = IndexedFasta::from_filepath(index, &fasta)?;
                write_samples(&mut faidx, &mut rng, length, count, &mut out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
