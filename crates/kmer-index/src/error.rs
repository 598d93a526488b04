//! Error Module - Index Error Types
//!
//! Defines all error types the k-mer index can surface. Per §7, allocation
//! and invariant failures are fatal — they are returned as `Err` here so the
//! caller can log and abort, rather than the core calling `process::abort`
//! itself.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for all k-mer index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Heap allocation failed: requested {requested} records, available {available}")]
    AllocationFailure { requested: u64, available: u64 },

    #[error("Heap initialization failed: {0}")]
    HeapInitialization(String),

    #[error(
        "Heap exhausted on worker {rank}: local cursor {pos_local} >= heap_block_size {heap_block_size}"
    )]
    HeapExhausted {
        rank: usize,
        pos_local: u64,
        heap_block_size: u64,
    },

    #[error("Invalid k-mer length: expected {expected} bases, got {actual}")]
    InvalidKmerLength { expected: usize, actual: usize },

    #[error("Invalid base {base:#04x} at position {position} (must be A, C, G, or T)")]
    InvalidBase { base: u8, position: usize },

    #[error("Worker rank {rank} out of range for {workers} workers")]
    InvalidRank { rank: usize, workers: usize },

    #[error("A synchronization barrier was poisoned by a panicking worker")]
    BarrierPoisoned,

    #[error("UFX file size {size} is not a multiple of record length {record_len}")]
    MalformedUfxFile { size: u64, record_len: u64 },
}

impl IndexError {
    /// Check if this error reflects a configuration/input bug rather than a
    /// transient condition. Per §7 all index failure modes are bugs, not
    /// transient conditions, but this mirrors the classification the
    /// surrounding driver uses to decide whether a retry would ever help
    /// (it never would here).
    pub fn is_bug(&self) -> bool {
        !matches!(self, IndexError::BarrierPoisoned)
    }
}

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_exhausted_is_bug() {
        let err = IndexError::HeapExhausted {
            rank: 0,
            pos_local: 10,
            heap_block_size: 10,
        };
        assert!(err.is_bug());
    }

    #[test]
    fn test_barrier_poisoned_is_not_bug() {
        assert!(!IndexError::BarrierPoisoned.is_bug());
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = ConfigError::InvalidK("k must be > 0".to_string());
        let err: IndexError = config_err.into();
        assert!(matches!(err, IndexError::Configuration(_)));
    }
}
