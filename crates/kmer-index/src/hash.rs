//! Hash Module (C2) - DJB2-Style Bucket Hash
//!
//! A pure function of the packed key only — `lExt`/`rExt` never participate.
//! The same key always lands in the same bucket regardless of which worker
//! or rank computed the hash (§4.2), which is what makes the chained lookup
//! protocol correct under concurrent insertion from any number of workers.

/// DJB2-style hash over raw bytes: `h = 5381; h = h*33 + byte` per byte,
/// wrapping on overflow (§4.2).
pub fn djb2(bytes: &[u8]) -> u64 {
    let mut h: u64 = 5381;
    for &b in bytes {
        h = h.wrapping_mul(33).wrapping_add(b as u64);
    }
    h
}

/// Hash a packed k-mer key down to a bucket index in `0..bucket_count`.
pub fn hash_kmer(packed: &[u8], bucket_count: u64) -> u64 {
    if bucket_count == 0 {
        return 0;
    }
    djb2(packed) % bucket_count
}
