//! # kmer-index - Concurrent, Globally Partitioned De Bruijn K-mer Hash Table
//!
//! `kmer-index` builds a shared chained hash table over fixed-length DNA
//! k-mers, sized and populated once by a fixed number of SPMD worker
//! threads, for use as the seed data structure of a de Bruijn genome
//! assembler.
//!
//! ## Overview
//!
//! Each k-mer is packed into a 2-bit-per-base byte string, hashed with a
//! DJB2-style function, and inserted into a bucket's singly-linked chain via
//! a lock-free compare-and-swap loop (no per-bucket locks, no mutex). The
//! heap that backs every chain node and the bucket table itself are both
//! striped across the worker threads in a fixed cyclic pattern, so a global
//! handle addresses a unique (worker, local offset) pair regardless of which
//! worker originally produced it.
//!
//! ## Quick Start
//!
//! ```rust
//! use kmer_index::{IndexConfig, KmerIndex, LookupResult};
//!
//! fn main() -> Result<(), kmer_index::IndexError> {
//!     let config = IndexConfig {
//!         k: 4,
//!         workers: 1,
//!         ..Default::default()
//!     };
//!
//!     // P = ceil(k / 4) = 1 byte for k = 4
//!     let index = KmerIndex::<1>::create(config, 16)?;
//!
//!     index.add(b"ACGT", b'A', b'T', 0)?;
//!
//!     match index.lookup(b"ACGT")? {
//!         LookupResult::Found { handle, .. } => println!("found at handle {handle}"),
//!         LookupResult::NotFound => println!("not present"),
//!     }
//!
//!     index.destroy();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    SPMD Worker Threads                   │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐               │
//! │  │ Worker 0 │  │ Worker 1 │  │ Worker W-1│              │
//! │  └────┬─────┘  └────┬─────┘  └────┬──────┘              │
//! │       │  pack/hash/reserve/CAS     │                     │
//! │       └─────────────┴─────────────┘                      │
//! └───────────────────────────┼──────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼──────────────────────────────┐
//! │             Shared, Cycled-Striped State                 │
//! │  ┌───────────────────────────────────────────┐           │
//! │  │   BucketTable: B atomic i64 chain heads     │           │
//! │  └───────────────────────────────────────────┘           │
//! │  ┌───────────────────────────────────────────┐           │
//! │  │   Heap: W local stripes of KmerRecord<P>    │           │
//! │  └───────────────────────────────────────────┘           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Insert Protocol
//!
//! 1. Pack the k-mer text and hash it to a bucket index (pure, no shared state).
//! 2. Reserve the next free slot in the calling worker's local heap stripe.
//! 3. Loop: write the record with `next` set to the bucket's current head,
//!    then try to CAS the head from that value to the new handle. On
//!    failure, adopt the CAS's reported actual value as the new `next` and
//!    retry.
//!
//! ### Lookup Protocol
//!
//! Hash the key to a bucket, then walk its chain from the head, comparing
//! packed keys, until a match is found or the chain ends at the sentinel.
//!
//! ## Safety
//!
//! The heap uses `unsafe` internally to give each worker lock-free,
//! allocation-free access to its own stripe, but the public API is entirely
//! safe. The invariant it depends on: every record is written exactly once,
//! by the worker that reserved its handle, strictly before that handle is
//! published through a bucket head CAS — see [`heap::Heap`] for the full
//! safety argument.
//!
//! ### Thread Safety
//!
//! - [`KmerIndex`] is `Send + Sync` and safe for concurrent `add`/`lookup`
//!   from any number of threads, bounded at `create()` time by
//!   [`config::IndexConfig::workers`].
//! - `add` calls from different workers never block each other; they may
//!   retry under contention on the same bucket.
//!
//! ## Modules
//!
//! - [`config`]: index sizing parameters and validation
//! - [`error`]: error types for all index operations
//! - [`logging`]: structured event logging for lifecycle and ingest/query operations
//! - [`codec`]: DNA 2-bit pack/unpack/compare (C1)
//! - [`hash`]: DJB2-style bucket hash (C2)
//! - [`heap`]: cycled per-worker record storage (C3)
//! - [`buckets`]: lock-free bucket chain heads (C4)
//! - [`index`]: insert/lookup protocol tying the above together (C5)
//! - [`start_list`]: per-worker start-k-mer bookkeeping (C6)
//! - [`ufx`]: UFX input file sizing helper
//!
//! ## Limitations
//!
//! - **No resizing**: bucket count and heap capacity are fixed at `create()`.
//! - **No persistence**: the index lives only as long as the process.
//! - **No UFX parsing**: [`ufx`] only validates file sizing; line-level UFX
//!   record parsing is the caller's responsibility (see `kmerctl`).

pub mod buckets;
pub mod codec;
pub mod config;
pub mod error;
pub mod hash;
pub mod heap;
pub mod index;
pub mod logging;
pub mod start_list;
pub mod ufx;

pub use config::IndexConfig;
pub use error::{IndexError, Result};
pub use heap::{KmerRecord, NO_NEXT};
pub use index::{KmerIndex, LookupResult};
pub use start_list::StartKmerList;

/// Crate version string from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_config_validates() {
        assert!(IndexConfig::default().validate().is_ok());
    }
}
