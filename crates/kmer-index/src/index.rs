//! Index Module (C5) - Insert/Lookup Protocol
//!
//! Ties the codec, hash, heap, and bucket table together into the lock-free
//! chained hash table described in §4.5-§4.6: `add` packs and hashes a key,
//! reserves a heap slot, then CAS-publishes it onto the head of its bucket's
//! chain, retrying with a freshly rewritten `next` on every CAS loss (I3/I4).
//! `lookup` walks the same chain comparing packed keys until it finds a match
//! or exhausts the chain (I2).

use crate::buckets::BucketTable;
use crate::codec;
use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::heap::{Heap, KmerRecord, NO_NEXT};
use crate::logging::{log_event, IndexEvent};

/// Outcome of a [`KmerIndex::lookup`].
#[derive(Debug, Clone, Copy)]
pub enum LookupResult<const P: usize> {
    Found { handle: i64, record: KmerRecord<P> },
    NotFound,
}

impl<const P: usize> LookupResult<P> {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found { .. })
    }
}

/// The globally partitioned de Bruijn k-mer hash table.
///
/// `P` is the packed key width in bytes (`ceil(K / 4)`), fixed at compile
/// time the way the original treats `K` as a compile-time constant
/// (§3 GLOSSARY). [`IndexConfig::k`] must agree with `P` at
/// [`KmerIndex::create`] time; a mismatch is a configuration error, not a
/// panic.
pub struct KmerIndex<const P: usize> {
    config: IndexConfig,
    heap: Heap<P>,
    buckets: BucketTable,
}

impl<const P: usize> KmerIndex<P> {
    /// Allocate the heap and bucket table for an index expected to hold
    /// roughly `n_entries` distinct k-mers (§4.6 "create"). This is the one
    /// point at which sizes are fixed; the index never resizes afterward.
    pub fn create(config: IndexConfig, n_entries: u64) -> Result<Self> {
        config.validate()?;
        if config.packed_len() != P {
            return Err(IndexError::HeapInitialization(format!(
                "configured k={} implies packed width {} but index was built for P={}",
                config.k,
                config.packed_len(),
                P
            )));
        }

        let bucket_count = config.bucket_count(n_entries).max(1);
        let heap = Heap::new(config.workers, config.heap_block_size);
        let buckets = BucketTable::new(bucket_count);

        log::info!(
            "index created: {} workers, {} heap slots, {} buckets",
            config.workers,
            heap.capacity(),
            buckets.len()
        );
        log_event(IndexEvent::Created {
            workers: config.workers,
            heap_capacity: heap.capacity(),
            bucket_count: buckets.len(),
        });

        Ok(Self {
            config,
            heap,
            buckets,
        })
    }

    /// Re-initialize the bucket heads this worker owns. Every worker must
    /// call this (or rely on [`Self::create`] having already zeroed
    /// everything) before crossing the barrier into the ingest phase
    /// (§4.4, §4.6).
    pub fn init_worker_stripe(&self, rank: usize) {
        self.buckets.init_stripe(rank, self.config.workers);
        log_event(IndexEvent::BarrierCrossed {
            rank,
            phase: "init",
        });
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn bucket_count(&self) -> u64 {
        self.buckets.len()
    }

    pub fn heap_capacity(&self) -> u64 {
        self.heap.capacity()
    }

    /// Insert a k-mer with its left/right extension bases, as worker `rank`.
    /// Returns the heap handle the record was published under.
    ///
    /// Protocol (§4.5.1): pack the key, hash it to a bucket, reserve a heap
    /// slot, then loop writing the record with the chain's current head as
    /// `next` and attempting to CAS the head to the new handle. On failure
    /// the CAS returns the actual current head, which becomes the record's
    /// new `next` for the retry — the write always precedes the CAS that
    /// publishes it (I3).
    pub fn add(&self, key: &[u8], l_ext: u8, r_ext: u8, rank: usize) -> Result<i64> {
        if rank >= self.config.workers {
            return Err(IndexError::InvalidRank {
                rank,
                workers: self.config.workers,
            });
        }

        let packed = codec::pack::<P>(key, self.config.k)?;
        let bucket = crate::hash::hash_kmer(&packed, self.buckets.len());
        let handle = self.heap.reserve(rank)?;

        let mut next = self.buckets.head(bucket);
        let mut retries = 0u32;
        loop {
            self.heap.write(
                handle,
                KmerRecord {
                    packed,
                    l_ext,
                    r_ext,
                    next,
                },
            );

            let actual = self.buckets.cas_head(bucket, next, handle);
            if actual == next {
                log_event(IndexEvent::Inserted {
                    rank,
                    bucket,
                    handle,
                    cas_retries: retries,
                });
                return Ok(handle);
            }
            next = actual;
            retries += 1;
        }
    }

    /// Look up a k-mer by its text key. Walks the bucket chain comparing
    /// packed keys until a match is found or the chain is exhausted (I2).
    pub fn lookup(&self, key: &[u8]) -> Result<LookupResult<P>> {
        let packed = codec::pack::<P>(key, self.config.k)?;
        let bucket = crate::hash::hash_kmer(&packed, self.buckets.len());

        let mut handle = self.buckets.head(bucket);
        let mut hops = 0u32;
        while handle != NO_NEXT {
            let record = self.heap.read(handle);
            hops += 1;
            if codec::compare(&packed, &record.packed) == std::cmp::Ordering::Equal {
                log_event(IndexEvent::Lookup {
                    bucket,
                    found: true,
                    chain_len: hops,
                });
                return Ok(LookupResult::Found { handle, record });
            }
            handle = record.next;
        }

        log_event(IndexEvent::Lookup {
            bucket,
            found: false,
            chain_len: hops,
        });
        Ok(LookupResult::NotFound)
    }

    /// Tear down the index. Rust's ownership already frees the heap and
    /// bucket table on drop; this only exists to emit the lifecycle event
    /// the original's explicit `destroy()` call does (§4.6).
    pub fn destroy(self) {
        log::info!("index destroyed ({} workers)", self.config.workers);
        log_event(IndexEvent::Destroyed {
            workers: self.config.workers,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn test_config(workers: usize) -> IndexConfig {
        IndexConfig {
            k: 4,
            workers,
            heap_block_size: 64,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_rejects_mismatched_p() {
        let config = IndexConfig {
            k: 8,
            ..Default::default()
        };
        let err = KmerIndex::<1>::create(config, 10).unwrap_err();
        assert!(matches!(err, IndexError::HeapInitialization(_)));
    }

    #[test]
    fn test_insert_then_lookup() {
        // Scenario 3.
        let index = KmerIndex::<1>::create(test_config(1), 10).unwrap();
        let handle = index.add(b"ACGT", b'A', b'T', 0).unwrap();

        match index.lookup(b"ACGT").unwrap() {
            LookupResult::Found { handle: found, .. } => assert_eq!(found, handle),
            LookupResult::NotFound => panic!("expected to find ACGT"),
        }

        assert!(!index.lookup(b"TTTT").unwrap().is_found());
    }

    #[test]
    fn test_hash_collision_chain() {
        // Scenario 4: force two distinct keys into the same single bucket
        // and confirm both remain independently reachable.
        let config = IndexConfig {
            k: 4,
            workers: 1,
            heap_block_size: 64,
            load_factor: 1.0,
            ..Default::default()
        };
        let index = KmerIndex::<1>::create(config, 1).unwrap();
        assert_eq!(index.bucket_count(), 1);

        index.add(b"ACGT", b'A', b'A', 0).unwrap();
        index.add(b"TTTT", b'C', b'C', 0).unwrap();

        assert!(index.lookup(b"ACGT").unwrap().is_found());
        assert!(index.lookup(b"TTTT").unwrap().is_found());
        assert!(!index.lookup(b"GGGG").unwrap().is_found());
    }

    #[test]
    fn test_concurrent_insert_from_two_workers() {
        // Scenario 5: two workers inserting disjoint key sets concurrently;
        // every key must be independently reachable afterward (P5/P9).
        let config = IndexConfig {
            k: 4,
            workers: 2,
            heap_block_size: 256,
            ..Default::default()
        };
        let index = Arc::new(KmerIndex::<1>::create(config, 64).unwrap());

        let bases = [b'A', b'C', b'G', b'T'];
        let keys: Vec<[u8; 4]> = (0..64)
            .map(|i| {
                [
                    bases[i % 4],
                    bases[(i / 4) % 4],
                    bases[(i / 16) % 4],
                    bases[(i / 64) % 4],
                ]
            })
            .collect();

        let (left, right) = keys.split_at(32);
        let left = left.to_vec();
        let right = right.to_vec();

        let idx_a = Arc::clone(&index);
        let t0 = thread::spawn(move || {
            for key in &left {
                idx_a.add(key, b'A', b'A', 0).unwrap();
            }
        });
        let idx_b = Arc::clone(&index);
        let t1 = thread::spawn(move || {
            for key in &right {
                idx_b.add(key, b'C', b'C', 1).unwrap();
            }
        });

        t0.join().unwrap();
        t1.join().unwrap();

        for key in &keys {
            assert!(index.lookup(key).unwrap().is_found());
        }
    }

    #[test]
    fn test_invalid_rank_rejected() {
        let index = KmerIndex::<1>::create(test_config(2), 10).unwrap();
        let err = index.add(b"ACGT", b'A', b'A', 5).unwrap_err();
        assert!(matches!(err, IndexError::InvalidRank { .. }));
    }

    #[test]
    fn test_heap_exhaustion_is_reported() {
        let config = IndexConfig {
            k: 4,
            workers: 1,
            heap_block_size: 1,
            ..Default::default()
        };
        let index = KmerIndex::<1>::create(config, 1).unwrap();
        index.add(b"ACGT", b'A', b'A', 0).unwrap();
        let err = index.add(b"TTTT", b'A', b'A', 0).unwrap_err();
        assert!(matches!(err, IndexError::HeapExhausted { .. }));
    }
}
