//! Bucket Table Module (C4) - Lock-Free Chain Heads
//!
//! `B` atomic `i64` heads, one per bucket, each either [`crate::heap::NO_NEXT`]
//! (empty) or a heap handle pointing at the most recently inserted record for
//! that bucket (§4.4). Insertion publishes new chain nodes with a
//! compare-and-swap loop rather than a lock (§4.5), so multiple workers can
//! race to extend the same bucket without blocking each other.

use crate::heap::NO_NEXT;
use std::sync::atomic::{AtomicI64, Ordering};

/// The shared table of bucket chain heads.
pub struct BucketTable {
    heads: Vec<AtomicI64>,
}

impl BucketTable {
    /// Allocate a table of `bucket_count` heads, all initialized to
    /// [`NO_NEXT`] (§4.4 "init").
    pub fn new(bucket_count: u64) -> Self {
        let heads = (0..bucket_count).map(|_| AtomicI64::new(NO_NEXT)).collect();
        Self { heads }
    }

    /// Number of buckets.
    pub fn len(&self) -> u64 {
        self.heads.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    /// Re-initialize the heads this worker owns, in the same cycled pattern
    /// the heap uses (`h mod workers == rank`). Redundant after [`Self::new`]
    /// already zeroed every head, but spelled out explicitly so the SPMD
    /// worker-owns-its-stripe init protocol described in §4.4 has a direct
    /// counterpart a caller can invoke per-worker before the first barrier.
    pub fn init_stripe(&self, rank: usize, workers: usize) {
        let mut h = rank as u64;
        while h < self.heads.len() as u64 {
            self.heads[h as usize].store(NO_NEXT, Ordering::Relaxed);
            h += workers as u64;
        }
    }

    /// Load the current head of bucket `h`. Paired with [`Heap::read`] via
    /// `Acquire` ordering, establishing happens-before with the `Release`
    /// half of whichever CAS most recently published to this bucket.
    ///
    /// [`Heap::read`]: crate::heap::Heap::read
    pub fn head(&self, h: u64) -> i64 {
        self.heads[h as usize].load(Ordering::Acquire)
    }

    /// Attempt to swing bucket `h`'s head from `expected` to `new`. Returns
    /// the actual previous value, whether or not the swap succeeded — on
    /// failure the caller rewrites its node's `next` to that value and
    /// retries (§4.5.1).
    pub fn cas_head(&self, h: u64, expected: i64, new: i64) -> i64 {
        match self.heads[h as usize].compare_exchange(
            expected,
            new,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(prev) => prev,
            Err(actual) => actual,
        }
    }
}
