//! Ingest command implementation.
//!
//! Spawns the configured number of SPMD worker threads, each reading its
//! share of one or more UFX-formatted input files and inserting every
//! record into a shared [`kmer_index::KmerIndex`] (§4.5, §4.7). Lines are
//! distributed round-robin by position across the combined input, mirroring
//! the original's per-rank UFX file sharding without requiring the input to
//! already be split into `W` physical files.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use kmer_index::StartKmerList;

use crate::commands::common::{self};
use crate::config::Config;
use crate::dispatch::{self, AnyIndex};
use crate::error::{CliError, Result};

/// Arguments for the ingest command.
#[derive(Debug, Clone)]
pub struct IngestArgs {
    /// UFX input files to ingest.
    pub inputs: Vec<PathBuf>,
    /// Index sizing and worker configuration.
    pub config: Config,
}

/// Summary statistics from an ingest run.
#[derive(Debug, Clone)]
pub struct IngestStats {
    pub inserted: u64,
    pub start_kmers: u64,
    pub bucket_count: u64,
    pub heap_capacity: u64,
    pub duration: Duration,
}

/// Build an index from `config` and ingest every UFX record in `inputs`
/// into it, returning the live index alongside ingest statistics. Exposed
/// separately from [`run_ingest`] so the `lookup` subcommand can rebuild the
/// same index and then query it (the index has no persistence, §4.6).
pub fn build_and_ingest(
    inputs: &[PathBuf],
    config: &Config,
) -> Result<(Box<dyn AnyIndex>, IngestStats)> {
    let index_config = config.to_index_config();
    index_config
        .validate()
        .map_err(kmer_index::IndexError::Configuration)?;

    let mut total_size = 0u64;
    for path in inputs {
        total_size += std::fs::metadata(path)?.len();
    }
    let n_entries = if total_size == 0 {
        1
    } else {
        kmer_index::ufx::num_kmers_in_file(total_size, index_config.k)?
    };

    let index = dispatch::build_index(&index_config, n_entries.max(1))?;

    let mut lines: Vec<Vec<u8>> = Vec::new();
    for path in inputs {
        let bytes = std::fs::read(path)?;
        for line in bytes.split(|&b| b == b'\n') {
            if !line.is_empty() {
                lines.push(line.to_vec());
            }
        }
    }

    let workers = index_config.workers.max(1);
    let k = index_config.k;
    let inserted = AtomicU64::new(0);
    let start_kmers = AtomicU64::new(0);

    let start = Instant::now();
    let worker_results: Vec<thread::Result<Result<()>>> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for rank in 0..workers {
            let lines = &lines;
            let index_ref: &dyn AnyIndex = index.as_ref();
            let inserted_ref = &inserted;
            let start_kmers_ref = &start_kmers;
            handles.push(scope.spawn(move || -> Result<()> {
                let mut started = StartKmerList::new();
                for (i, line) in lines.iter().enumerate() {
                    if i % workers != rank {
                        continue;
                    }
                    let record = common::parse_ufx_line(line, k)?;
                    let handle = index_ref.add(record.kmer, record.l_ext, record.r_ext, rank)?;
                    inserted_ref.fetch_add(1, Ordering::Relaxed);
                    if common::is_start_kmer(record.l_ext) {
                        started.push(handle);
                        start_kmers_ref.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Ok(())
            }));
        }
        handles.into_iter().map(|h| h.join()).collect()
    });

    for result in worker_results {
        match result {
            Ok(Ok(())) => {},
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(CliError::Config("a worker thread panicked".to_string())),
        }
    }

    let stats = IngestStats {
        inserted: inserted.load(Ordering::Relaxed),
        start_kmers: start_kmers.load(Ordering::Relaxed),
        bucket_count: index.bucket_count(),
        heap_capacity: index.heap_capacity(),
        duration: start.elapsed(),
    };

    Ok((index, stats))
}

/// Run the `ingest` subcommand: build the index, report stats, and discard
/// it (there is nowhere to persist it to).
pub fn run_ingest(args: IngestArgs) -> Result<IngestStats> {
    let (_index, stats) = build_and_ingest(&args.inputs, &args.config)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_ufx(records: &[(&str, u8, u8)]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for (kmer, l, r) in records {
            writeln!(file, "{} {}{}", kmer, *l as char, *r as char).unwrap();
        }
        file
    }

    #[test]
    fn test_ingest_then_lookup() {
        let file = write_ufx(&[("ACGT", b'F', b'C'), ("TTTT", b'A', b'G')]);
        let config = Config {
            k: 4,
            workers: 2,
            heap_block_size: 64,
            ..Default::default()
        };

        let (index, stats) = build_and_ingest(&[file.path().to_path_buf()], &config).unwrap();
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.start_kmers, 1);
        assert!(index.lookup(b"ACGT").unwrap().is_some());
        assert!(index.lookup(b"TTTT").unwrap().is_some());
        assert!(index.lookup(b"GGGG").unwrap().is_none());
    }
}
