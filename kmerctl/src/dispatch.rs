//! Runtime-to-Compile-Time K Dispatch
//!
//! [`kmer_index::KmerIndex`] is generic over a const `P` (the packed key
//! width in bytes), since `K` is fixed at build time for a given index. A
//! CLI, though, only learns `k` at runtime from `--k` or a
//! config file. [`AnyIndex`] erases `P` behind an object-safe trait so the
//! rest of the driver never has to know it; [`build_index`] is the one
//! place that matches a runtime `packed_len()` against a fixed, compiled
//! set of `P` values and picks the matching monomorphization.

use kmer_index::{IndexConfig, KmerIndex, LookupResult};

use crate::error::{CliError, Result};

/// Object-safe view over a `KmerIndex<P>` for any compiled `P`.
pub trait AnyIndex: Send + Sync {
    fn add(&self, key: &[u8], l_ext: u8, r_ext: u8, rank: usize) -> kmer_index::Result<i64>;

    /// Returns `Some((handle, lExt, rExt))` on a hit.
    fn lookup(&self, key: &[u8]) -> kmer_index::Result<Option<(i64, u8, u8)>>;

    fn bucket_count(&self) -> u64;
    fn heap_capacity(&self) -> u64;
    fn workers(&self) -> usize;
}

impl<const P: usize> AnyIndex for KmerIndex<P> {
    fn add(&self, key: &[u8], l_ext: u8, r_ext: u8, rank: usize) -> kmer_index::Result<i64> {
        KmerIndex::add(self, key, l_ext, r_ext, rank)
    }

    fn lookup(&self, key: &[u8]) -> kmer_index::Result<Option<(i64, u8, u8)>> {
        match KmerIndex::lookup(self, key)? {
            LookupResult::Found { handle, record } => Ok(Some((handle, record.l_ext, record.r_ext))),
            LookupResult::NotFound => Ok(None),
        }
    }

    fn bucket_count(&self) -> u64 {
        KmerIndex::bucket_count(self)
    }

    fn heap_capacity(&self) -> u64 {
        KmerIndex::heap_capacity(self)
    }

    fn workers(&self) -> usize {
        self.config().workers
    }
}

macro_rules! dispatch_create {
    ($config:expr, $n_entries:expr, [$($p:literal),+ $(,)?]) => {
        match $config.packed_len() {
            $(
                $p => Ok(Box::new(KmerIndex::<$p>::create($config.clone(), $n_entries)?) as Box<dyn AnyIndex>),
            )+
            other => Err(CliError::UnsupportedK {
                k: $config.k,
                packed_len: other,
            }),
        }
    };
}

/// Build a `KmerIndex<P>` for whichever compiled `P` matches `config`'s
/// `k`, boxed behind [`AnyIndex`]. Supports `k` in `1..=64` (`P` in
/// `1..=16`).
pub fn build_index(config: &IndexConfig, n_entries: u64) -> Result<Box<dyn AnyIndex>> {
    dispatch_create!(
        config,
        n_entries,
        [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_index_dispatches_on_k() {
        let config = IndexConfig {
            k: 4,
            workers: 1,
            heap_block_size: 64,
            ..Default::default()
        };
        let index = build_index(&config, 16).unwrap();
        let handle = index.add(b"ACGT", b'A', b'T', 0).unwrap();
        assert_eq!(index.lookup(b"ACGT").unwrap(), Some((handle, b'A', b'T')));
    }

    #[test]
    fn test_build_index_rejects_unsupported_k() {
        let config = IndexConfig {
            k: 1000,
            ..Default::default()
        };
        let err = build_index(&config, 16).unwrap_err();
        assert!(matches!(err, CliError::UnsupportedK { .. }));
    }
}
