//! Configuration Module - Index Sizing Parameters
//!
//! Manages the parameters that control k-mer width, bucket count, and
//! per-worker heap capacity. Everything here is decided once at `create()`
//! time; the index never resizes (see the crate's Non-goals).

/// Main configuration for the k-mer index.
///
/// # Examples
///
/// ```rust
/// use kmer_index::IndexConfig;
///
/// // Use default configuration (K = 51, matching the original UFX pipeline)
/// let config = IndexConfig::default();
///
/// // Custom configuration for a small test k-mer length
/// let config = IndexConfig {
///     k: 4,
///     workers: 2,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// K-mer length, in bases.
    ///
    /// Determines the packed key width `P = ceil(k / 4)` bytes (§4.1).
    /// Default: 51 (the original UFX pipeline's default).
    pub k: usize,

    /// Bucket table load factor.
    ///
    /// Number of buckets `B = ceil(n_entries * load_factor)`. Recommended
    /// `>= 1.0`; the reference uses exactly `1.0`.
    /// Default: 1.0
    pub load_factor: f64,

    /// Number of SPMD worker threads (`W`).
    ///
    /// Must be `>= 1`. The heap and bucket table are both cycled-striped
    /// across this many workers.
    /// Default: number of logical CPUs, at least 1.
    pub workers: usize,

    /// Per-worker heap stripe capacity (`heapBlockSize`), in records.
    ///
    /// Each worker's local cursor must stay below this value; exceeding it
    /// raises `HeapExhausted` (§7). Total heap capacity is
    /// `workers * heap_block_size` records.
    /// Default: 1 << 20 (about 1M k-mers per worker).
    pub heap_block_size: u64,

    /// Maximum contig length used by the (external, out of scope) traversal
    /// stage. Retained here only because the original ambient defaults
    /// header defines it alongside `k` and `load_factor`; the index core
    /// never reads it.
    /// Default: 100_000
    pub maximum_contig_size: usize,

    /// Enable verbose event logging during ingest/query.
    /// Default: false
    pub verbose: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            k: 51,
            load_factor: 1.0,
            workers: num_cpus_or_one(),
            heap_block_size: 1 << 20,
            maximum_contig_size: 100_000,
            verbose: false,
        }
    }
}

impl IndexConfig {
    /// Packed key width in bytes: `ceil(k / 4)`.
    pub fn packed_len(&self) -> usize {
        (self.k + 3) / 4
    }

    /// Validate configuration.
    ///
    /// Checks every value the lifecycle (§4.6) depends on before any
    /// allocation happens, so a misconfiguration fails fast instead of as
    /// a confusing allocation-size panic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::InvalidK("k must be > 0".to_string()));
        }

        if self.load_factor < 1.0 {
            return Err(ConfigError::InvalidLoadFactor(
                "load_factor must be >= 1.0".to_string(),
            ));
        }

        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount(
                "workers must be > 0".to_string(),
            ));
        }

        if self.heap_block_size == 0 {
            return Err(ConfigError::InvalidHeapBlockSize(
                "heap_block_size must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Build configuration from environment variables, overriding defaults.
    ///
    /// Recognized variables:
    /// - `KMER_INDEX_K`
    /// - `KMER_INDEX_WORKERS`
    /// - `KMER_INDEX_HEAP_BLOCK_SIZE`
    /// - `KMER_INDEX_LOAD_FACTOR`
    /// - `KMER_INDEX_VERBOSE`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("KMER_INDEX_K") {
            if let Ok(k) = val.parse::<usize>() {
                config.k = k;
            }
        }

        if let Ok(val) = std::env::var("KMER_INDEX_WORKERS") {
            if let Ok(workers) = val.parse::<usize>() {
                config.workers = workers;
            }
        }

        if let Ok(val) = std::env::var("KMER_INDEX_HEAP_BLOCK_SIZE") {
            if let Ok(size) = val.parse::<u64>() {
                config.heap_block_size = size;
            }
        }

        if let Ok(val) = std::env::var("KMER_INDEX_LOAD_FACTOR") {
            if let Ok(lf) = val.parse::<f64>() {
                config.load_factor = lf;
            }
        }

        if let Ok(val) = std::env::var("KMER_INDEX_VERBOSE") {
            config.verbose = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config
    }

    /// Number of buckets for a given number of distinct entries:
    /// `ceil(n_entries * load_factor)`.
    pub fn bucket_count(&self, n_entries: u64) -> u64 {
        ((n_entries as f64) * self.load_factor).ceil() as u64
    }
}

fn num_cpus_or_one() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Error types for configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid k: {0}")]
    InvalidK(String),

    #[error("Invalid load factor: {0}")]
    InvalidLoadFactor(String),

    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(String),

    #[error("Invalid heap block size: {0}")]
    InvalidHeapBlockSize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.k, 51);
        assert_eq!(config.packed_len(), 13);
    }

    #[test]
    fn test_packed_len_rounds_up() {
        let config = IndexConfig {
            k: 5,
            ..Default::default()
        };
        assert_eq!(config.packed_len(), 2);
    }

    #[test]
    fn test_invalid_k() {
        let config = IndexConfig {
            k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_load_factor() {
        let config = IndexConfig {
            load_factor: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bucket_count() {
        let config = IndexConfig {
            load_factor: 1.0,
            ..Default::default()
        };
        assert_eq!(config.bucket_count(100), 100);
    }
}
