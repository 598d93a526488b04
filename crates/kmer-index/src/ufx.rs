//! UFX Sizing Helper (A4)
//!
//! UFX is the original pipeline's fixed-width input format: each line holds
//! `K` bases, a separator, a left-extension character, a right-extension
//! character, and a newline — `K + 4` bytes per record. Parsing UFX text is
//! out of scope here (see the crate's Non-goals); this module only answers
//! the sizing question the original's `getNumKmersInUFX` answers, so a
//! caller can pick a `n_entries` for [`crate::index::KmerIndex::create`]
//! before it has read a single record.

use crate::error::{IndexError, Result};

/// Bytes per UFX record for a given k-mer length: `K` bases + separator +
/// `lExt` + `rExt` + newline.
pub fn record_len(k: usize) -> u64 {
    k as u64 + 4
}

/// Number of k-mer records in a UFX file of `file_size` bytes, given k-mer
/// length `k`. Fails if the file size is not an exact multiple of the
/// per-record length — a UFX file is never partially written or padded.
pub fn num_kmers_in_file(file_size: u64, k: usize) -> Result<u64> {
    let len = record_len(k);
    if file_size % len != 0 {
        return Err(IndexError::MalformedUfxFile {
            size: file_size,
            record_len: len,
        });
    }
    Ok(file_size / len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_len() {
        assert_eq!(record_len(51), 55);
        assert_eq!(record_len(4), 8);
    }

    #[test]
    fn test_num_kmers_exact() {
        // 3 records of k=4 (record_len 8) -> 24 bytes.
        assert_eq!(num_kmers_in_file(24, 4).unwrap(), 3);
    }

    #[test]
    fn test_num_kmers_rejects_partial_file() {
        let err = num_kmers_in_file(25, 4).unwrap_err();
        assert!(matches!(err, IndexError::MalformedUfxFile { .. }));
    }

    #[test]
    fn test_num_kmers_empty_file() {
        assert_eq!(num_kmers_in_file(0, 4).unwrap(), 0);
    }
}
