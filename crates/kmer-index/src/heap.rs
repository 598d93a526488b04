//! Heap Module (C3) - Cycled Per-Worker Record Storage
//!
//! The shared heap is striped across `W` workers in a fixed cyclic pattern:
//! global handle `g` lives at local offset `g / W` on worker `g % W` (§4.3,
//! §3 "cycled" distribution). Every record is written exactly once, by the
//! worker that reserved it, before the handle is ever published into a
//! bucket chain — so the heap itself needs no synchronization beyond the
//! per-worker reservation counter. What the original spreads across W
//! disjoint remote-memory segments, a single Rust process holds as W
//! disjoint local arrays in one address space; the addressing scheme and
//! its external behavior (§4.3, P10) carry over unchanged, only the
//! transport collapses (see DESIGN.md).

use crate::error::{IndexError, Result};
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};

/// The sentinel handle meaning "end of chain" / "empty bucket" (§9, resolved).
pub const NO_NEXT: i64 = -1;

/// A single heap-resident k-mer record: packed key, its two extension bases,
/// and the intrusive singly-linked `next` handle used by the bucket chain
/// (§4.3, §4.4).
#[derive(Debug, Clone, Copy)]
pub struct KmerRecord<const P: usize> {
    pub packed: [u8; P],
    pub l_ext: u8,
    pub r_ext: u8,
    pub next: i64,
}

/// Cycled heap of `KmerRecord<P>` slots, striped across `workers` local
/// arrays of `heap_block_size` records each.
///
/// # Safety
///
/// Each slot is written at most once, by the single worker that reserved its
/// handle via [`Heap::reserve`], strictly before that handle is published
/// into a bucket chain via a successful CAS (§4.5.1). Readers only ever
/// reach a handle after observing it through an `Acquire` load of a bucket
/// head that was stored with `Release`/`AcqRel` ordering, which establishes
/// the happens-before edge this type relies on to make the plain (non-atomic)
/// read in [`Heap::read`] sound.
pub struct Heap<const P: usize> {
    workers: usize,
    heap_block_size: u64,
    slots: Vec<Box<[UnsafeCell<MaybeUninit<KmerRecord<P>>>]>>,
    cursors: Vec<AtomicU64>,
}

// SAFETY: see the struct-level safety comment. Slots are only ever written
// once by their owning worker before being published through an atomic CAS.
unsafe impl<const P: usize> Sync for Heap<P> {}

impl<const P: usize> Heap<P> {
    /// Allocate a heap with `workers` stripes of `heap_block_size` records
    /// each. Total capacity is `workers * heap_block_size` (§4.3).
    pub fn new(workers: usize, heap_block_size: u64) -> Self {
        let slots = (0..workers)
            .map(|_| {
                (0..heap_block_size)
                    .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
                    .collect::<Vec<_>>()
                    .into_boxed_slice()
            })
            .collect();
        let cursors = (0..workers).map(|_| AtomicU64::new(0)).collect();

        Self {
            workers,
            heap_block_size,
            slots,
            cursors,
        }
    }

    /// Total record capacity across all workers.
    pub fn capacity(&self) -> u64 {
        self.workers as u64 * self.heap_block_size
    }

    /// The worker that owns global handle `g`: `g mod W` (§4.3).
    pub fn owner(&self, g: i64) -> usize {
        (g as u64 % self.workers as u64) as usize
    }

    /// The local offset of global handle `g` within its owner's stripe:
    /// `g div W` (§4.3).
    pub fn local_offset(&self, g: i64) -> u64 {
        g as u64 / self.workers as u64
    }

    /// Reserve the next free slot on `rank`'s local stripe and return its
    /// global handle. Fails with [`IndexError::HeapExhausted`] once the
    /// local cursor reaches `heap_block_size` (§7).
    pub fn reserve(&self, rank: usize) -> Result<i64> {
        let pos_local = self.cursors[rank].fetch_add(1, Ordering::Relaxed);
        if pos_local >= self.heap_block_size {
            log::error!(
                "worker {} heap exhausted: cursor {} >= block size {}",
                rank,
                pos_local,
                self.heap_block_size
            );
            return Err(IndexError::HeapExhausted {
                rank,
                pos_local,
                heap_block_size: self.heap_block_size,
            });
        }
        Ok(pos_local as i64 * self.workers as i64 + rank as i64)
    }

    /// Write a record into a reserved slot. Must only be called once per
    /// handle, by the worker that reserved it, and before that handle is
    /// published via [`crate::buckets::BucketTable::cas_head`].
    pub fn write(&self, g: i64, record: KmerRecord<P>) {
        let owner = self.owner(g);
        let offset = self.local_offset(g) as usize;
        // SAFETY: single-writer-before-publish, see struct-level comment.
        unsafe {
            (*self.slots[owner][offset].get()).write(record);
        }
    }

    /// Read a previously-written record by handle. Must only be called
    /// after observing `g` through an `Acquire` load of a bucket head (or
    /// of another record's `next` field reached transitively from one).
    pub fn read(&self, g: i64) -> KmerRecord<P> {
        let owner = self.owner(g);
        let offset = self.local_offset(g) as usize;
        // SAFETY: see struct-level comment; the caller's Acquire load
        // establishes happens-before with the writer's Release CAS.
        unsafe { (*self.slots[owner][offset].get()).assume_init() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_addressing() {
        let heap: Heap<1> = Heap::new(3, 4);
        let g0 = heap.reserve(0).unwrap();
        let g1 = heap.reserve(1).unwrap();
        let g2 = heap.reserve(2).unwrap();
        let g3 = heap.reserve(0).unwrap();

        assert_eq!((heap.owner(g0), heap.local_offset(g0)), (0, 0));
        assert_eq!((heap.owner(g1), heap.local_offset(g1)), (1, 0));
        assert_eq!((heap.owner(g2), heap.local_offset(g2)), (2, 0));
        assert_eq!((heap.owner(g3), heap.local_offset(g3)), (0, 1));
    }

    #[test]
    fn test_write_then_read() {
        let heap: Heap<1> = Heap::new(2, 4);
        let g = heap.reserve(0).unwrap();
        heap.write(
            g,
            KmerRecord {
                packed: [0x1B],
                l_ext: b'A',
                r_ext: b'C',
                next: NO_NEXT,
            },
        );
        let rec = heap.read(g);
        assert_eq!(rec.packed, [0x1B]);
        assert_eq!(rec.l_ext, b'A');
        assert_eq!(rec.r_ext, b'C');
        assert_eq!(rec.next, NO_NEXT);
    }

    #[test]
    fn test_heap_exhausted() {
        let heap: Heap<1> = Heap::new(1, 2);
        heap.reserve(0).unwrap();
        heap.reserve(0).unwrap();
        let err = heap.reserve(0).unwrap_err();
        assert!(matches!(err, IndexError::HeapExhausted { .. }));
    }

    // P10: cycled addressing is a bijection between handles and (owner, offset).
    #[quickcheck_macros::quickcheck]
    fn prop_cycled_addressing_bijective(workers: u8, count: u8) -> bool {
        let workers = (workers % 7 + 1) as usize;
        let count = (count % 32) as u64;
        let heap: Heap<1> = Heap::new(workers, count.max(1) + 1);

        let mut seen = std::collections::HashSet::new();
        for i in 0..count {
            let rank = (i as usize) % workers;
            let g = heap.reserve(rank).unwrap();
            if heap.owner(g) != rank {
                return false;
            }
            if !seen.insert(g) {
                return false;
            }
        }
        true
    }
}
